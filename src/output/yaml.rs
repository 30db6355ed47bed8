//! YAML report rendering

use crate::crawler::PageNode;

use super::ReportError;

pub fn render(page: &PageNode) -> Result<String, ReportError> {
    Ok(serde_yaml::to_string(page)?)
}
