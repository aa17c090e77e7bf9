use crate::database::{insert_draw, max_draw_number};
use crate::types::DrawRow;
use crate::utils;
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

const DRAW_API_URL: &str = "https://www.dhlottery.co.kr/common.do?method=getLottoNumber&drwNo=";

#[derive(Deserialize, Debug)]
pub struct DrawApiResponse {
    #[serde(rename = "returnValue")]
    pub return_value: String,
    #[serde(rename = "drwNo")]
    pub draw_number: Option<i64>,
    #[serde(rename = "drwNoDate")]
    pub draw_date: Option<String>,
    #[serde(rename = "drwtNo1")]
    pub number1: Option<i64>,
    #[serde(rename = "drwtNo2")]
    pub number2: Option<i64>,
    #[serde(rename = "drwtNo3")]
    pub number3: Option<i64>,
    #[serde(rename = "drwtNo4")]
    pub number4: Option<i64>,
    #[serde(rename = "drwtNo5")]
    pub number5: Option<i64>,
    #[serde(rename = "drwtNo6")]
    pub number6: Option<i64>,
    #[serde(rename = "bnusNo")]
    pub bonus_number: Option<i64>,
}

impl DrawApiResponse {
    /// `returnValue: "fail"` marks a round the upstream has not published;
    /// incomplete payloads are treated the same way.
    pub fn into_draw(self) -> Option<DrawRow> {
        if self.return_value != "success" {
            return None;
        }
        let draw = DrawRow {
            draw_number: self.draw_number?,
            draw_date: self.draw_date?,
            number1: self.number1?,
            number2: self.number2?,
            number3: self.number3?,
            number4: self.number4?,
            number5: self.number5?,
            number6: self.number6?,
            bonus_number: self.bonus_number?,
        };
        if !utils::is_valid_draw_date(&draw.draw_date) {
            return None;
        }
        Some(draw)
    }
}

pub async fn fetch_draw(
    client: &reqwest::Client,
    round: i64,
) -> Result<Option<DrawRow>, Box<dyn Error>> {
    let url = format!("{}{}", DRAW_API_URL, round);
    let response: DrawApiResponse = client.get(&url).send().await?.json().await?;
    Ok(response.into_draw())
}

/// Walks upward from the highest round stored locally, inserting every
/// published round until `upto` or the first unpublished one.
pub async fn sync_draws(db: &Mutex<Connection>, upto: i64) -> Result<u32, Box<dyn Error>> {
    let start = {
        let conn = db.lock().map_err(|_| "database lock poisoned")?;
        max_draw_number(&conn)?.unwrap_or(0) + 1
    };

    if start > upto {
        return Ok(0);
    }

    let client = reqwest::Client::new();
    let mut synced = 0u32;

    for round in start..=upto {
        match fetch_draw(&client, round).await? {
            Some(draw) => {
                let conn = db.lock().map_err(|_| "database lock poisoned")?;
                insert_draw(&conn, &draw)?;
                drop(conn);
                info!("synced draw {} ({})", draw.draw_number, draw.draw_date);
                synced += 1;
            }
            None => {
                info!("round {} not published yet, stopping sync", round);
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Ok(synced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_published_round() {
        let payload = r#"{
            "returnValue": "success",
            "drwNo": 1153,
            "drwNoDate": "2025-01-04",
            "drwtNo1": 1, "drwtNo2": 9, "drwtNo3": 12,
            "drwtNo4": 26, "drwtNo5": 35, "drwtNo6": 38,
            "bnusNo": 30,
            "totSellamnt": 113224687000
        }"#;
        let response: DrawApiResponse = serde_json::from_str(payload).unwrap();
        let draw = response.into_draw().unwrap();
        assert_eq!(draw.draw_number, 1153);
        assert_eq!(draw.main_numbers(), [1, 9, 12, 26, 35, 38]);
        assert_eq!(draw.bonus_number, 30);
    }

    #[test]
    fn test_parse_unpublished_round() {
        let payload = r#"{"returnValue":"fail"}"#;
        let response: DrawApiResponse = serde_json::from_str(payload).unwrap();
        assert!(response.into_draw().is_none());
    }

    #[test]
    fn test_incomplete_payload_rejected() {
        let payload = r#"{"returnValue":"success","drwNo":1200}"#;
        let response: DrawApiResponse = serde_json::from_str(payload).unwrap();
        assert!(response.into_draw().is_none());
    }
}
