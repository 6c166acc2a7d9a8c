use super::Notice;
use crate::api::DeskApi;
use crate::error::DeskResult;
use crate::request::HttpClient;
use routedesk_shared::{Ack, Node};

const FETCH_FAILED: &str = "Failed to fetch nodes";
const EXTRACT_FAILED: &str = "Failed to extract orders";
const RESET_FAILED: &str = "Failed to reset nodes";

/// Display model for one pending node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCard {
    pub node_id: i64,
    pub title: String,
    pub order: String,
    pub customer: String,
    pub location: String,
    pub weight: String,
    pub delivery_window: String,
    pub traffic_level: String,
    pub traffic_class: String,
    pub region: String,
}

impl NodeCard {
    pub fn from_node(node: &Node) -> Self {
        let customer = node
            .customer
            .name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(node.customer.customer_id.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unknown")
            .to_string();
        let traffic = node.traffic_level.clone().unwrap_or_default();

        Self {
            node_id: node.node_id,
            title: format!("Node #{}", node.node_id),
            order: format!("Order #{}", node.order_id),
            customer,
            location: format!("{:.4}, {:.4}", node.lat, node.long),
            weight: node
                .package_weight
                .map(|w| format!("{} kg", w))
                .unwrap_or_else(|| "N/A".to_string()),
            delivery_window: node.delivery_window.clone().unwrap_or_default(),
            traffic_class: traffic_badge_class(&traffic),
            traffic_level: traffic,
            region: node
                .customer
                .region
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Badge class keyed by the lower-cased traffic level.
pub fn traffic_badge_class(level: &str) -> String {
    let key = level.trim().to_lowercase();
    if key.is_empty() {
        "traffic-level".to_string()
    } else {
        format!("traffic-level {}", key)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersPage {
    pub nodes: Vec<Node>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl OrdersPage {
    pub fn cards(&self) -> Vec<NodeCard> {
        self.nodes.iter().map(NodeCard::from_node).collect()
    }

    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn finish_load(&mut self, result: DeskResult<Vec<Node>>) {
        self.loading = false;
        match result {
            Ok(nodes) => self.nodes = nodes,
            Err(e) => {
                log::warn!("Pending nodes: {}", e);
                self.notice = Some(Notice::error(e.user_message(FETCH_FAILED)));
            }
        }
    }

    /// Returns true when the list should be refreshed.
    pub fn finish_extract(&mut self, result: DeskResult<Ack>) -> bool {
        self.finish_mutation(result, "Orders extracted successfully", EXTRACT_FAILED)
    }

    /// Returns true when the list should be refreshed.
    pub fn finish_reset(&mut self, result: DeskResult<Ack>) -> bool {
        self.finish_mutation(result, "Nodes reset successfully", RESET_FAILED)
    }

    fn finish_mutation(&mut self, result: DeskResult<Ack>, ok: &str, fallback: &str) -> bool {
        match result {
            Ok(_) => {
                self.notice = Some(Notice::success(ok));
                true
            }
            Err(e) => {
                log::warn!("{}: {}", fallback, e);
                self.loading = false;
                self.notice = Some(Notice::error(e.user_message(fallback)));
                false
            }
        }
    }

    pub async fn load<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) {
        self.begin();
        let result = api.pending_nodes().await;
        self.finish_load(result);
    }

    pub async fn extract<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) {
        self.begin();
        let result = api.extract_orders().await;
        if self.finish_extract(result) {
            self.load(api).await;
        }
    }

    pub async fn reset<C: HttpClient + Clone>(&mut self, api: &DeskApi<C>) {
        self.begin();
        let result = api.reset_nodes().await;
        if self.finish_reset(result) {
            self.load(api).await;
        }
    }
}
