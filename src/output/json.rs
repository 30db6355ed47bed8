//! JSON report rendering

use crate::crawler::PageNode;

use super::ReportError;

pub fn render(page: &PageNode) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(page)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_children_serialize() {
        let child = PageNode {
            url: "https://example.com/a".to_string(),
            title: "A".to_string(),
            assets: Default::default(),
            links: vec![],
            broken: vec![],
            children: vec![],
        };
        let root = PageNode {
            url: "https://example.com/".to_string(),
            title: "Root".to_string(),
            assets: Default::default(),
            links: vec![],
            broken: vec!["https://example.com/missing".to_string()],
            children: vec![child],
        };

        let parsed: serde_json::Value = serde_json::from_str(&render(&root).unwrap()).unwrap();
        assert_eq!(parsed["children"][0]["url"], "https://example.com/a");
        assert_eq!(parsed["broken"][0], "https://example.com/missing");
    }
}
