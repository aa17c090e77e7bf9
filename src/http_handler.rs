use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::error;

use crate::pages;
use crate::types::{AnalysisRequest, ChatRequest, PredictionRequest};
use crate::use_cases::{AnalysisUseCase, ChatUseCase, LotteryUseCase, PredictionUseCase};

const ERR_QUERY: &str = "데이터 조회 중 오류가 발생했습니다.";
const ERR_NO_DRAWS: &str = "저장된 당첨번호가 없습니다.";
const ERR_BAD_REQUEST: &str = "잘못된 요청 형식입니다.";
const ERR_MESSAGE_REQUIRED: &str = "메시지를 입력해주세요.";
const ERR_TYPE_REQUIRED: &str = "분석 유형을 선택해주세요.";
const ERR_ALGORITHM_REQUIRED: &str = "알고리즘을 선택해주세요.";

#[derive(Clone)]
pub struct AppState {
    pub lottery: Arc<LotteryUseCase>,
    pub analysis: Arc<AnalysisUseCase>,
    pub prediction: Arc<PredictionUseCase>,
    pub chat: Arc<ChatUseCase>,
}

impl AppState {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        let prediction = Arc::new(PredictionUseCase::new(Arc::clone(&db)));
        Self {
            lottery: Arc::new(LotteryUseCase::new(Arc::clone(&db))),
            analysis: Arc::new(AnalysisUseCase::new(Arc::clone(&db))),
            chat: Arc::new(ChatUseCase::new(Arc::clone(&db), Arc::clone(&prediction))),
            prediction,
        }
    }
}

pub fn router(state: AppState, static_dir: &str) -> Router {
    let api = Router::new()
        .route("/draws/latest", get(get_latest_draw))
        .route("/draws", get(get_draws))
        .route("/stores", get(get_stores))
        .route("/chatbot", post(post_chatbot))
        .route("/analysis", post(post_analysis))
        .route("/prediction", post(post_prediction))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

fn ok(data: impl serde::Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn err(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "error": message }))
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

async fn get_latest_draw(State(state): State<AppState>) -> Json<Value> {
    match state.lottery.latest_draw() {
        Ok(Some(draw)) => ok(draw),
        Ok(None) => err(ERR_NO_DRAWS),
        Err(e) => {
            error!("latest draw query failed: {}", e);
            err(ERR_QUERY)
        }
    }
}

#[derive(Debug, Deserialize)]
struct DrawsQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn get_draws(State(state): State<AppState>, Query(q): Query<DrawsQuery>) -> Json<Value> {
    let limit = q.limit.unwrap_or(10).clamp(1, 100);
    let offset = q.offset.unwrap_or(0).max(0);
    match state.lottery.draws(limit, offset) {
        Ok(draws) => ok(draws),
        Err(e) => {
            error!("draw listing failed: {}", e);
            err(ERR_QUERY)
        }
    }
}

async fn get_stores(State(state): State<AppState>) -> Json<Value> {
    match state.lottery.stores() {
        Ok(stores) => ok(stores),
        Err(e) => {
            error!("store listing failed: {}", e);
            err(ERR_QUERY)
        }
    }
}

// POST bodies are parsed by hand so malformed JSON and missing fields both
// come back as the fixed-string error envelope, not an extractor rejection.
async fn post_chatbot(State(state): State<AppState>, body: String) -> Json<Value> {
    let request: ChatRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(_) => return err(ERR_BAD_REQUEST),
    };
    let Some(message) = request.message else {
        return err(ERR_MESSAGE_REQUIRED);
    };

    match state.chat.respond(&message) {
        Ok(content) => ok(json!({ "content": content, "role": "assistant" })),
        Err(e) => {
            error!("chat responder failed: {}", e);
            err(ERR_QUERY)
        }
    }
}

async fn post_analysis(State(state): State<AppState>, body: String) -> Json<Value> {
    let request: AnalysisRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(_) => return err(ERR_BAD_REQUEST),
    };
    let Some(analysis_type) = request.analysis_type else {
        return err(ERR_TYPE_REQUIRED);
    };

    match state.analysis.run(&analysis_type) {
        Ok(result) => ok(result),
        Err(e) => {
            error!("analysis {} failed: {}", analysis_type, e);
            err(ERR_QUERY)
        }
    }
}

async fn post_prediction(State(state): State<AppState>, body: String) -> Json<Value> {
    let request: PredictionRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(_) => return err(ERR_BAD_REQUEST),
    };
    let Some(algorithm) = request.algorithm else {
        return err(ERR_ALGORITHM_REQUIRED);
    };

    match state.prediction.generate(&algorithm) {
        Ok(prediction) => ok(prediction),
        Err(e) => {
            error!("prediction {} failed: {}", algorithm, e);
            err(ERR_QUERY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;
    use crate::database::test_support::{seed_stores, test_conn, test_draw};
    use crate::use_cases::NOT_IMPLEMENTED_SUMMARY;

    fn test_state<F: FnOnce(&Connection)>(seed: F) -> AppState {
        let conn = test_conn();
        seed(&conn);
        AppState::new(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_latest_draw_envelope() {
        let state = test_state(|conn| {
            database::insert_draw(conn, &test_draw(1185, [5, 11, 19, 27, 36, 44], 3)).unwrap();
        });

        let Json(v) = get_latest_draw(State(state)).await;
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"]["draw_number"], json!(1185));
        assert_eq!(v["data"]["bonus_number"], json!(3));
    }

    #[tokio::test]
    async fn test_latest_draw_empty_database() {
        let state = test_state(|_| {});

        let Json(v) = get_latest_draw(State(state)).await;
        assert_eq!(v["success"], json!(false));
        assert_eq!(v["error"], json!(ERR_NO_DRAWS));
    }

    #[tokio::test]
    async fn test_draws_paging() {
        let state = test_state(|conn| {
            for n in 1..=5 {
                database::insert_draw(conn, &test_draw(n, [1, 2, 3, 4, 5, 6], 7)).unwrap();
            }
        });

        let query = Query(DrawsQuery {
            limit: Some(2),
            offset: Some(1),
        });
        let Json(v) = get_draws(State(state), query).await;
        assert_eq!(v["success"], json!(true));
        let draws = v["data"].as_array().unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0]["draw_number"], json!(4));
    }

    #[tokio::test]
    async fn test_draws_limit_clamped() {
        let state = test_state(|conn| {
            database::insert_draw(conn, &test_draw(1, [1, 2, 3, 4, 5, 6], 7)).unwrap();
        });

        let query = Query(DrawsQuery {
            limit: Some(100000),
            offset: None,
        });
        let Json(v) = get_draws(State(state), query).await;
        assert_eq!(v["success"], json!(true));
    }

    #[tokio::test]
    async fn test_stores_envelope() {
        let state = test_state(|conn| seed_stores(conn));

        let Json(v) = get_stores(State(state)).await;
        assert_eq!(v["success"], json!(true));
        let stores = v["data"].as_array().unwrap();
        assert_eq!(stores[0]["name"], json!("명당슈퍼"));
    }

    #[tokio::test]
    async fn test_prediction_missing_algorithm() {
        let state = test_state(|_| {});

        let Json(v) = post_prediction(State(state), "{}".to_string()).await;
        assert_eq!(v["success"], json!(false));
        assert_eq!(v["error"], json!(ERR_ALGORITHM_REQUIRED));
    }

    #[tokio::test]
    async fn test_prediction_malformed_body() {
        let state = test_state(|_| {});

        let Json(v) = post_prediction(State(state), "not json".to_string()).await;
        assert_eq!(v["success"], json!(false));
        assert_eq!(v["error"], json!(ERR_BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_prediction_success_shape() {
        let state = test_state(|_| {});

        let body = r#"{"algorithm":"montecarlo"}"#.to_string();
        let Json(v) = post_prediction(State(state), body).await;
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"]["numbers"].as_array().unwrap().len(), 6);
        let confidence = v["data"]["confidence"].as_f64().unwrap();
        assert!((0.5..0.8).contains(&confidence));
    }

    #[tokio::test]
    async fn test_analysis_unknown_type_is_success() {
        let state = test_state(|_| {});

        let body = r#"{"type":"carryover"}"#.to_string();
        let Json(v) = post_analysis(State(state), body).await;
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"]["summary"], json!(NOT_IMPLEMENTED_SUMMARY));
    }

    #[tokio::test]
    async fn test_analysis_missing_type() {
        let state = test_state(|_| {});

        let Json(v) = post_analysis(State(state), "{}".to_string()).await;
        assert_eq!(v["success"], json!(false));
        assert_eq!(v["error"], json!(ERR_TYPE_REQUIRED));
    }

    #[tokio::test]
    async fn test_chatbot_roundtrip() {
        let state = test_state(|conn| seed_stores(conn));

        let body = r#"{"message":"로또 명당 알려줘"}"#.to_string();
        let Json(v) = post_chatbot(State(state), body).await;
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"]["role"], json!("assistant"));
        assert!(v["data"]["content"].as_str().unwrap().contains("명당슈퍼"));
    }

    #[tokio::test]
    async fn test_chatbot_missing_message() {
        let state = test_state(|_| {});

        let Json(v) = post_chatbot(State(state), "{}".to_string()).await;
        assert_eq!(v["success"], json!(false));
        assert_eq!(v["error"], json!(ERR_MESSAGE_REQUIRED));
    }
}
