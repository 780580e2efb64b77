//! Live component showcase: every item kind, grouped by category, rendered
//! through a disposable displayer. Doubles as the broadest regression
//! surface for the item catalogue.

use serde_json::Value;

use crate::displayer::{Displayer, ModuleSpec};
use crate::error::Result;
use crate::item::{ItemCategory, ItemKind};
use crate::layout::Layout;

/// Compose one module per category holding the self-test instance of each
/// kind in that category, then serialize the whole page.
pub fn build_showcase() -> Result<Value> {
    let mut displayer = Displayer::new();
    displayer.set_title("Component showcase")?;

    for category in ItemCategory::ALL {
        displayer.add_module(ModuleSpec::allowed(category.label()))?;
        let layout_id = displayer.add_master_layout(Layout::vertical([12])?)?;
        for kind in ItemKind::ALL {
            if kind.category() != category {
                continue;
            }
            displayer.add_display_item(kind.self_test(), 0, None, Some(layout_id))?;
        }
    }

    displayer.display(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn showcase_renders_every_kind() {
        let page = build_showcase().expect("showcase composes");
        let modules = page["modules"].as_object().unwrap();
        assert_eq!(modules.len(), ItemCategory::ALL.len());

        let mut seen = 0;
        for module in modules.values() {
            for layout in module["layouts"].as_array().unwrap() {
                for row in layout["lines"].as_array().unwrap() {
                    for cell in row.as_array().unwrap() {
                        for item in cell.as_array().unwrap() {
                            assert!(item.get("kind").is_some());
                            seen += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(seen, ItemKind::ALL.len());
    }

    #[test]
    fn showcase_aggregates_catalogue_resources() {
        let page = build_showcase().unwrap();
        // Chart assets come in through the advanced category.
        let cdn_js = page["required_cdn_js"].as_array().unwrap();
        assert!(cdn_js.iter().any(|v| v.as_str().unwrap().contains("chart")));
        assert_eq!(page["title"], json!("Component showcase"));
    }
}
