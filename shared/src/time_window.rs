//! Delivery time windows.
//!
//! The solver emits windows as `[start, end]` minutes since midnight, older
//! payloads carry a slot label such as `"Morning"`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeWindow {
    Minutes([u32; 2]),
    Label(String),
}

fn clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::Minutes([start, end]) => write!(f, "{}–{}", clock(*start), clock(*end)),
            TimeWindow::Label(label) => f.write_str(label),
        }
    }
}
