use crate::api::DeskApi;
use crate::error::DeskResult;
use crate::request::HttpClient;
use routedesk_shared::{Conversation, SituationKind, SituationRequest};

const SITUATION_FAILED: &str = "Failed to get recommendation";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SituationsPage {
    pub kind: SituationKind,
    pub vehicle_id: String,
    pub near_customer: String,
    pub note: String,
    /// Optional trip the situation belongs to.
    pub trip_id: String,
    pub loading: bool,
    pub error: Option<String>,
    pub conversation: Option<Conversation>,
}

impl SituationsPage {
    /// Request body for the current form, or `None` while a required field is blank.
    pub fn request(&self) -> Option<SituationRequest> {
        let vehicle_id = self.vehicle_id.trim();
        let near_customer = self.near_customer.trim();
        if vehicle_id.is_empty() || near_customer.is_empty() {
            return None;
        }
        let note = self.note.trim();
        Some(SituationRequest {
            vehicle_id: vehicle_id.to_string(),
            near_customer: near_customer.to_string(),
            note: (!note.is_empty()).then(|| note.to_string()),
        })
    }

    pub fn trip(&self) -> Option<&str> {
        Some(self.trip_id.trim()).filter(|t| !t.is_empty())
    }

    /// Marks the page busy and returns what to send; `None` leaves state as is.
    pub fn begin(&mut self) -> Option<SituationRequest> {
        let req = self.request()?;
        self.loading = true;
        self.error = None;
        Some(req)
    }

    pub fn finish(&mut self, result: DeskResult<Conversation>) {
        self.loading = false;
        match result {
            Ok(conversation) => {
                log::debug!(
                    "{} reply with {} messages",
                    conversation.kind.label(),
                    conversation.messages.len()
                );
                self.conversation = Some(conversation);
            }
            Err(e) => {
                log::warn!("Situation request failed: {}", e);
                self.error = Some(e.user_message(SITUATION_FAILED));
            }
        }
    }

    pub fn clear(&mut self) {
        self.conversation = None;
        self.error = None;
    }

    pub async fn submit<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) {
        let Some(req) = self.begin() else {
            return;
        };
        let trip = self.trip().map(str::to_string);
        let result = api.situation(self.kind, trip.as_deref(), req).await;
        self.finish(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MockHttpClient;
    use routedesk_shared::ChatRole;
    use serde_json::{Value, json};

    const BASE: &str = "http://api.test";

    fn filled(kind: SituationKind) -> SituationsPage {
        SituationsPage {
            kind,
            vehicle_id: "V2".into(),
            near_customer: "C079".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_fields_make_no_call() {
        let client = MockHttpClient::new();
        let api = DeskApi::new(BASE, client.clone());

        let mut page = SituationsPage {
            vehicle_id: "V2".into(),
            near_customer: "   ".into(),
            ..Default::default()
        };
        let before = page.clone();
        page.submit(&api).await;

        assert_eq!(client.request_count(), 0);
        assert_eq!(page, before);
    }

    #[tokio::test]
    async fn test_blank_vehicle_makes_no_call() {
        let client = MockHttpClient::new();
        let api = DeskApi::new(BASE, client.clone());

        for vehicle in ["", "  "] {
            let mut page = SituationsPage {
                kind: SituationKind::Fatigue,
                vehicle_id: vehicle.into(),
                near_customer: "C079".into(),
                ..Default::default()
            };
            assert!(page.request().is_none());
            let before = page.clone();
            page.submit(&api).await;
            assert_eq!(page, before);
        }
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_fuel_reply_reads_conversation() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/situation/fuel"),
            200,
            json!({ "status": "success", "conversation": [
                { "role": "user", "content": "Low fuel near C079" },
                { "role": "assistant", "content": "Nearest station is 1.2 km away" }
            ] }),
        );
        let api = DeskApi::new(BASE, client.clone());

        let mut page = filled(SituationKind::Fuel);
        page.note = " running low ".into();
        page.submit(&api).await;

        let conversation = page.conversation.as_ref().unwrap();
        assert_eq!(conversation.kind, SituationKind::Fuel);
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[1].role, ChatRole::Assistant);
        assert!(!page.loading);

        let body: Value = serde_json::from_str(client.requests()[0].3.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "vehicle_id": "V2", "near_customer": "C079", "note": "running low" })
        );
    }

    #[tokio::test]
    async fn test_general_reads_chat_history_and_trip_suffix() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/situation/recommend/trip-7"),
            200,
            json!({ "status": "success", "chat_history": [
                { "role": "assistant", "content": "Reroute via depot" }
            ] }),
        );
        let api = DeskApi::new(BASE, client);

        let mut page = filled(SituationKind::General);
        page.trip_id = "trip-7".into();
        page.submit(&api).await;
        assert_eq!(page.conversation.unwrap().messages[0].content, "Reroute via depot");
    }

    #[tokio::test]
    async fn test_missing_list_is_empty_conversation() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{BASE}/api/situation/fatigue"),
            200,
            json!({ "status": "success" }),
        );
        let api = DeskApi::new(BASE, client);

        let mut page = filled(SituationKind::Fatigue);
        page.submit(&api).await;
        assert!(page.conversation.unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn test_failure_then_clear() {
        let client = MockHttpClient::new();
        client.mock_unreachable(&format!("{BASE}/api/situation/fatigue"));
        let api = DeskApi::new(BASE, client);

        let mut page = filled(SituationKind::Fatigue);
        page.submit(&api).await;
        assert_eq!(page.error.as_deref(), Some("Failed to get recommendation"));

        page.clear();
        assert!(page.error.is_none());
        assert!(page.conversation.is_none());
        assert_eq!(page.vehicle_id, "V2");
    }
}
