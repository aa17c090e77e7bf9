use anyhow::{Result, anyhow};
use rand::Rng;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

use crate::database;
use crate::types::{
    AnalysisResult, DrawRow, FALLBACK_EXPLANATION, Prediction, StoreRow, algorithm_info,
};
use crate::utils;

/// Window sizes the statistics are computed over.
const HOT_COLD_WINDOW: i64 = 20;
const PATTERN_WINDOW: i64 = 10;
const STORE_LIMIT: i64 = 20;
const CHAT_STORE_LIMIT: i64 = 3;

pub const NOT_IMPLEMENTED_SUMMARY: &str = "아직 지원하지 않는 분석 유형입니다.";
pub const EMPTY_DATA_SUMMARY: &str = "저장된 당첨번호가 없어 분석할 수 없습니다.";

type Db = Arc<Mutex<rusqlite::Connection>>;

fn lock(connection: &Db) -> Result<MutexGuard<'_, rusqlite::Connection>> {
    connection.lock().map_err(|_| anyhow!("database lock poisoned"))
}

pub struct LotteryUseCase {
    connection: Db,
}

impl LotteryUseCase {
    pub fn new(connection: Db) -> Self {
        Self { connection }
    }

    pub fn latest_draw(&self) -> Result<Option<DrawRow>> {
        let conn = lock(&self.connection)?;
        Ok(database::get_latest_draw(&conn)?)
    }

    pub fn draws(&self, limit: i64, offset: i64) -> Result<Vec<DrawRow>> {
        let conn = lock(&self.connection)?;
        Ok(database::get_draws(&conn, limit, offset)?)
    }

    pub fn stores(&self) -> Result<Vec<StoreRow>> {
        let conn = lock(&self.connection)?;
        Ok(database::get_stores(&conn, STORE_LIMIT)?)
    }
}

pub struct AnalysisUseCase {
    connection: Db,
}

impl AnalysisUseCase {
    pub fn new(connection: Db) -> Self {
        Self { connection }
    }

    pub fn run(&self, analysis_type: &str) -> Result<AnalysisResult> {
        match analysis_type {
            "frequency" => self.frequency(),
            "hot-cold" => self.hot_cold(),
            "pattern" => self.pattern(),
            other => Ok(Self::not_implemented(other)),
        }
    }

    fn frequency(&self) -> Result<AnalysisResult> {
        let (freqs, total_draws) = {
            let conn = lock(&self.connection)?;
            (
                database::get_number_frequencies(&conn)?,
                database::count_draws(&conn)?,
            )
        };

        let mut ranked = freqs.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let top: Vec<String> = ranked
            .iter()
            .take(10)
            .map(|(n, c)| format!("{}({}회)", n, c))
            .collect();

        let entries: Vec<_> = freqs
            .iter()
            .map(|(n, c)| json!({ "number": n, "count": c }))
            .collect();

        Ok(AnalysisResult {
            analysis_type: "frequency".to_string(),
            data: json!({ "frequencies": entries, "total_draws": total_draws }),
            summary: format!("역대 최다 출현 번호 TOP 10: {}", top.join(", ")),
            visualization: Some(json!({
                "chart_type": "bar",
                "labels": freqs.iter().map(|(n, _)| n.to_string()).collect::<Vec<_>>(),
                "values": freqs.iter().map(|(_, c)| c).collect::<Vec<_>>(),
            })),
        })
    }

    fn hot_cold(&self) -> Result<AnalysisResult> {
        let recent = {
            let conn = lock(&self.connection)?;
            database::get_recent_draws(&conn, HOT_COLD_WINDOW)?
        };

        let mut counts = [0i64; 45];
        for draw in &recent {
            for n in draw.main_numbers() {
                counts[(n - 1) as usize] += 1;
            }
        }

        let mut hot: Vec<(i64, i64)> = (1..=45i64)
            .filter(|n| counts[(n - 1) as usize] > 0)
            .map(|n| (n, counts[(n - 1) as usize]))
            .collect();
        hot.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        hot.truncate(10);

        let cold: Vec<i64> = (1..=45i64)
            .filter(|n| counts[(n - 1) as usize] == 0)
            .collect();

        let hot_list: Vec<String> = hot.iter().map(|(n, c)| format!("{}({}회)", n, c)).collect();
        let cold_list: Vec<String> = cold.iter().take(10).map(|n| n.to_string()).collect();

        Ok(AnalysisResult {
            analysis_type: "hot-cold".to_string(),
            data: json!({
                "window": recent.len(),
                "hot": hot.iter().map(|(n, c)| json!({ "number": n, "count": c })).collect::<Vec<_>>(),
                "cold": cold,
            }),
            summary: format!(
                "최근 {}회 기준 핫 번호: {} / 콜드 번호: {}",
                recent.len(),
                hot_list.join(", "),
                cold_list.join(", ")
            ),
            visualization: None,
        })
    }

    fn pattern(&self) -> Result<AnalysisResult> {
        let recent = {
            let conn = lock(&self.connection)?;
            database::get_recent_draws(&conn, PATTERN_WINDOW)?
        };

        if recent.is_empty() {
            return Ok(AnalysisResult {
                analysis_type: "pattern".to_string(),
                data: json!({}),
                summary: EMPTY_DATA_SUMMARY.to_string(),
                visualization: None,
            });
        }

        let mut even = 0i64;
        let mut low = 0i64;
        let total = (recent.len() * 6) as i64;
        for draw in &recent {
            for n in draw.main_numbers() {
                if n % 2 == 0 {
                    even += 1;
                }
                if n <= 22 {
                    low += 1;
                }
            }
        }
        let odd = total - even;
        let high = total - low;

        let pct = |count: i64| ((count as f64) * 1000.0 / (total as f64)).round() / 10.0;

        Ok(AnalysisResult {
            analysis_type: "pattern".to_string(),
            data: json!({
                "window": recent.len(),
                "even_count": even,
                "odd_count": odd,
                "low_count": low,
                "high_count": high,
                "even_pct": pct(even),
                "odd_pct": pct(odd),
                "low_pct": pct(low),
                "high_pct": pct(high),
            }),
            summary: format!(
                "최근 {}회 기준 짝수 {:.1}% : 홀수 {:.1}%, 저구간(1~22) {:.1}% : 고구간(23~45) {:.1}%",
                recent.len(),
                pct(even),
                pct(odd),
                pct(low),
                pct(high)
            ),
            visualization: None,
        })
    }

    fn not_implemented(analysis_type: &str) -> AnalysisResult {
        AnalysisResult {
            analysis_type: analysis_type.to_string(),
            data: json!({}),
            summary: NOT_IMPLEMENTED_SUMMARY.to_string(),
            visualization: None,
        }
    }
}

/// Six distinct numbers in [1,45], ascending. Rejection sampling on a
/// growing set, so duplicates simply retry.
fn generate_numbers(rng: &mut impl Rng) -> Vec<i64> {
    let mut picked: HashSet<i64> = HashSet::new();
    while picked.len() < 6 {
        picked.insert(rng.random_range(1..=45));
    }
    let mut numbers: Vec<i64> = picked.into_iter().collect();
    numbers.sort_unstable();
    numbers
}

pub struct PredictionUseCase {
    connection: Db,
}

impl PredictionUseCase {
    pub fn new(connection: Db) -> Self {
        Self { connection }
    }

    /// The algorithm token only selects the attached explanation; number
    /// generation is the same uniform draw for every token, and unknown
    /// tokens are accepted with the fallback explanation.
    pub fn generate(&self, algorithm: &str) -> Result<Prediction> {
        let mut rng = rand::rng();
        let numbers = generate_numbers(&mut rng);
        let confidence = rng.random_range(0.5..0.8);

        let (label, explanation) = match algorithm_info(algorithm) {
            Some(info) => (info.label, info.explanation),
            None => (algorithm, FALLBACK_EXPLANATION),
        };

        // Log row is best-effort; a failed insert never fails the request.
        let serialized = utils::numbers_to_csv(&numbers);
        match self.connection.lock() {
            Ok(conn) => {
                if let Err(e) =
                    database::insert_prediction(&conn, algorithm, &serialized, confidence)
                {
                    warn!("failed to log prediction: {}", e);
                }
            }
            Err(_) => warn!("database lock poisoned; prediction not logged"),
        }

        Ok(Prediction {
            numbers,
            algorithm: algorithm.to_string(),
            confidence,
            explanation: explanation.to_string(),
            reason: format!("{} 기반으로 생성된 추천 조합입니다.", label),
        })
    }
}

const LATEST_KEYWORDS: [&str; 4] = ["최신", "당첨번호", "이번주", "latest"];
const FREQUENCY_KEYWORDS: [&str; 4] = ["자주", "빈도", "많이 나온", "frequency"];
const STORE_KEYWORDS: [&str; 4] = ["명당", "판매점", "로또방", "store"];
const PREDICT_KEYWORDS: [&str; 4] = ["예측", "추천", "번호 생성", "predict"];

const FALLBACK_REPLIES: [&str; 3] = [
    "죄송해요, 잘 이해하지 못했어요. 최신 당첨번호, 자주 나온 번호, 명당 판매점, 번호 예측에 대해 물어보세요.",
    "궁금한 내용을 조금 더 구체적으로 말씀해 주시면 도와드릴게요!",
    "이런 질문은 어떠세요? \"이번주 당첨번호 알려줘\", \"로또 명당 알려줘\", \"번호 예측해줘\"",
];

pub struct ChatUseCase {
    connection: Db,
    prediction: Arc<PredictionUseCase>,
}

impl ChatUseCase {
    pub fn new(connection: Db, prediction: Arc<PredictionUseCase>) -> Self {
        Self {
            connection,
            prediction,
        }
    }

    /// Ordered first-match-wins keyword dispatch; no conversational memory.
    pub fn respond(&self, message: &str) -> Result<String> {
        let normalized = message.to_lowercase();

        if contains_any(&normalized, &LATEST_KEYWORDS) {
            return self.latest_reply();
        }
        if contains_any(&normalized, &FREQUENCY_KEYWORDS) {
            return self.frequency_reply();
        }
        if contains_any(&normalized, &STORE_KEYWORDS) {
            return self.store_reply();
        }
        if contains_any(&normalized, &PREDICT_KEYWORDS) {
            return self.predict_reply();
        }

        let mut rng = rand::rng();
        Ok(FALLBACK_REPLIES[rng.random_range(0..FALLBACK_REPLIES.len())].to_string())
    }

    fn latest_reply(&self) -> Result<String> {
        let conn = lock(&self.connection)?;
        match database::get_latest_draw(&conn)? {
            Some(draw) => Ok(format!(
                "제{}회({}) 당첨번호는 {} + 보너스 {}입니다.",
                draw.draw_number,
                draw.draw_date,
                utils::format_number_list(&draw.main_numbers()),
                draw.bonus_number
            )),
            None => Ok("아직 저장된 당첨번호가 없습니다.".to_string()),
        }
    }

    fn frequency_reply(&self) -> Result<String> {
        let conn = lock(&self.connection)?;
        let mut freqs = database::get_number_frequencies(&conn)?;
        freqs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let top: Vec<String> = freqs
            .iter()
            .take(5)
            .map(|(n, c)| format!("{}({}회)", n, c))
            .collect();
        Ok(format!(
            "역대 가장 자주 나온 번호는 {} 입니다.",
            top.join(", ")
        ))
    }

    fn store_reply(&self) -> Result<String> {
        let conn = lock(&self.connection)?;
        let stores = database::get_stores(&conn, CHAT_STORE_LIMIT)?;
        if stores.is_empty() {
            return Ok("등록된 판매점 정보가 없습니다.".to_string());
        }
        let lines: Vec<String> = stores
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "{}위 {}({}, 1등 {}회)",
                    i + 1,
                    s.name,
                    s.region,
                    s.first_prize_count
                )
            })
            .collect();
        Ok(format!("1등 배출 명당입니다. {}", lines.join(", ")))
    }

    fn predict_reply(&self) -> Result<String> {
        let prediction = self.prediction.generate("frequency")?;
        Ok(format!(
            "추천 번호는 {} 입니다. (신뢰도 {:.0}%)",
            utils::format_number_list(&prediction.numbers),
            prediction.confidence * 100.0
        ))
    }
}

fn contains_any(message: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| message.contains(k))
}
