// Page templates shared by the two front ends.

use snafu::prelude::*;

use handlebars::Handlebars;
use serde::Serialize;

use crate::dash::*;

pub const INDEX_PAGE: &str = "index";
pub const DASHBOARD_PAGE: &str = "dashboard";

const TEMPLATES: [(&str, &str); 2] = [
    (INDEX_PAGE, include_str!("../../templates/index.hbs")),
    (DASHBOARD_PAGE, include_str!("../../templates/dashboard.hbs")),
];

/// The compiled page templates.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> DashResult<Pages> {
        let mut registry = Handlebars::new();
        registry
            .register_partial("styles", include_str!("../../templates/styles.hbs"))
            .context(TemplateSnafu { name: "styles" })?;
        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .context(TemplateSnafu { name })?;
        }
        Ok(Pages { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> DashResult<String> {
        self.registry
            .render(name, data)
            .context(RenderSnafu { name })
    }
}

/// JSON that can be embedded in a `<script>` element.
pub fn script_json<T: Serialize>(value: &T) -> DashResult<String> {
    let js = serde_json::to_string(value).context(ParsingJsonSnafu {})?;
    Ok(js.replace('<', "\\u003c"))
}

/// A rate as shown on the pages, with one decimal.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}", rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_compile() {
        assert!(Pages::new().is_ok());
    }

    #[test]
    fn script_json_cannot_close_the_script() {
        let js = script_json(&vec!["</script><b>"]).unwrap();
        assert!(!js.contains('<'));
        let back: Vec<String> = serde_json::from_str(&js).unwrap();
        assert_eq!(back, vec!["</script><b>"]);
    }

    #[test]
    fn rates_have_one_decimal() {
        assert_eq!(format_rate(60.0), "60.0");
        assert_eq!(format_rate(66.7), "66.7");
    }
}
