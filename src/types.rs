use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct DrawRow {
    pub draw_number: i64,
    pub draw_date: String,
    pub number1: i64,
    pub number2: i64,
    pub number3: i64,
    pub number4: i64,
    pub number5: i64,
    pub number6: i64,
    pub bonus_number: i64,
}

impl DrawRow {
    pub fn main_numbers(&self) -> [i64; 6] {
        [
            self.number1,
            self.number2,
            self.number3,
            self.number4,
            self.number5,
            self.number6,
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub region: String,
    pub first_prize_count: i64,
    pub total_prize_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    #[serde(rename = "type")]
    pub analysis_type: String,
    pub data: Value,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct Prediction {
    pub numbers: Vec<i64>,
    pub algorithm: String,
    pub confidence: f64,
    pub explanation: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(rename = "type")]
    pub analysis_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub algorithm: Option<String>,
}

/// One entry of the prediction-algorithm catalog. The token is the wire
/// value, the label is what the page shows, and the explanation is the
/// sentence attached to generated numbers.
#[derive(Debug, Serialize)]
pub struct AlgorithmInfo {
    pub token: &'static str,
    pub label: &'static str,
    pub explanation: &'static str,
}

pub const ALGORITHMS: [AlgorithmInfo; 10] = [
    AlgorithmInfo {
        token: "frequency",
        label: "빈도 분석",
        explanation: "역대 당첨번호의 출현 빈도를 가중치로 반영한 조합입니다.",
    },
    AlgorithmInfo {
        token: "neural",
        label: "신경망 예측",
        explanation: "다층 신경망이 학습한 번호 간 상관관계를 반영한 조합입니다.",
    },
    AlgorithmInfo {
        token: "pattern",
        label: "패턴 인식",
        explanation: "최근 회차의 홀짝·고저 패턴을 분석해 도출한 조합입니다.",
    },
    AlgorithmInfo {
        token: "montecarlo",
        label: "몬테카를로 시뮬레이션",
        explanation: "수만 회의 가상 추첨 시뮬레이션에서 선별된 조합입니다.",
    },
    AlgorithmInfo {
        token: "bayesian",
        label: "베이지안 추론",
        explanation: "사전 확률을 회차마다 갱신하는 베이지안 모델의 조합입니다.",
    },
    AlgorithmInfo {
        token: "genetic",
        label: "유전 알고리즘",
        explanation: "세대를 거듭하며 적합도가 높은 조합만 남긴 결과입니다.",
    },
    AlgorithmInfo {
        token: "markov",
        label: "마르코프 체인",
        explanation: "직전 회차에서의 전이 확률을 따라 생성된 조합입니다.",
    },
    AlgorithmInfo {
        token: "regression",
        label: "회귀 분석",
        explanation: "번호별 출현 추세선을 회귀 모델로 연장한 조합입니다.",
    },
    AlgorithmInfo {
        token: "clustering",
        label: "군집 분석",
        explanation: "번호 군집별 대표값을 고르게 섞어 구성한 조합입니다.",
    },
    AlgorithmInfo {
        token: "ensemble",
        label: "앙상블 종합",
        explanation: "여러 예측 모델의 결과를 종합 투표로 합산한 조합입니다.",
    },
];

pub const FALLBACK_EXPLANATION: &str = "무작위 표본 추출로 생성된 조합입니다.";

pub fn algorithm_info(token: &str) -> Option<&'static AlgorithmInfo> {
    ALGORITHMS.iter().find(|a| a.token == token)
}

/// Analysis-type catalog. Three types carry real aggregation; the rest
/// answer with the placeholder summary until they are built out.
#[derive(Debug, Serialize)]
pub struct AnalysisInfo {
    pub token: &'static str,
    pub label: &'static str,
}

pub const ANALYSES: [AnalysisInfo; 8] = [
    AnalysisInfo { token: "frequency", label: "번호별 출현 빈도" },
    AnalysisInfo { token: "hot-cold", label: "핫/콜드 번호" },
    AnalysisInfo { token: "pattern", label: "홀짝·고저 패턴" },
    AnalysisInfo { token: "sum-range", label: "합계 구간 분포" },
    AnalysisInfo { token: "consecutive", label: "연속 번호 출현" },
    AnalysisInfo { token: "interval", label: "재출현 간격" },
    AnalysisInfo { token: "carryover", label: "이월수 분석" },
    AnalysisInfo { token: "combination", label: "조합 유형 분석" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_tokens_distinct() {
        for (i, a) in ALGORITHMS.iter().enumerate() {
            for b in ALGORITHMS.iter().skip(i + 1) {
                assert_ne!(a.token, b.token);
                assert_ne!(a.explanation, b.explanation);
            }
        }
    }

    #[test]
    fn test_algorithm_lookup() {
        assert_eq!(algorithm_info("markov").unwrap().label, "마르코프 체인");
        assert!(algorithm_info("astrology").is_none());
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(ALGORITHMS.len(), 10);
        assert_eq!(ANALYSES.len(), 8);
    }
}
