use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chip labels rendered by the chat platform; fixed, not derived from results.
pub const CHIP_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

#[derive(Debug, Deserialize)]
pub struct DemoRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub num_results: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

// =============================================================================
// Fulfillment envelope (chat platform webhook schema). Field names follow the
// platform's mixed casing exactly.
// =============================================================================

#[derive(Debug, Serialize)]
pub struct FulfillmentEnvelope {
    #[serde(rename = "sessionInfo")]
    pub session_info: SessionInfo,
    pub fulfillment_response: FulfillmentResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct FulfillmentResponse {
    pub messages: Vec<ResponseMessage>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResponseMessage {
    Text { text: TextMessage },
    Payload { payload: RichContentPayload },
}

#[derive(Debug, Serialize)]
pub struct TextMessage {
    pub text: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RichContentPayload {
    #[serde(rename = "richContent")]
    pub rich_content: Vec<Vec<ChipsCard>>,
}

#[derive(Debug, Serialize)]
pub struct ChipsCard {
    #[serde(rename = "type")]
    pub kind: String,
    pub options: Vec<ChipOption>,
}

#[derive(Debug, Serialize)]
pub struct ChipOption {
    pub text: String,
}

impl FulfillmentEnvelope {
    /// One summary message plus the static chip selection, session marked
    /// authenticated.
    pub fn conversational(summary: String) -> Self {
        let mut parameters = Map::new();
        parameters.insert(
            "userAuthenticated".to_string(),
            Value::String("y".to_string()),
        );

        FulfillmentEnvelope {
            session_info: SessionInfo { parameters },
            fulfillment_response: FulfillmentResponse {
                messages: vec![
                    ResponseMessage::Text {
                        text: TextMessage {
                            text: vec![summary],
                        },
                    },
                    ResponseMessage::Payload {
                        payload: RichContentPayload {
                            rich_content: vec![vec![ChipsCard {
                                kind: "chips".to_string(),
                                options: CHIP_OPTIONS
                                    .iter()
                                    .map(|label| ChipOption {
                                        text: label.to_string(),
                                    })
                                    .collect(),
                            }]],
                        },
                    },
                ],
            },
        }
    }
}
