//! HTML rendering of an analysis report
//!
//! Produces one self-contained document: embedded CSS, text dumps in
//! `<pre>` blocks and charts as inline SVG.

use super::Report;
use crate::describe;

/// Escape HTML special characters to prevent XSS
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate embedded CSS styles
fn generate_styles() -> &'static str {
    r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        pre {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            padding: 12px;
            overflow-x: auto;
            font-size: 0.9em;
        }
        .verdict {
            font-weight: bold;
        }
        .normal {
            color: #2e7d32;
        }
        .not-normal {
            color: #c62828;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            display: inline-block;
            margin: 0 20px 20px 0;
        }
        .chart-error {
            color: #cc0000;
            font-style: italic;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
}

fn section(html: &mut String, heading: &str, body: &str) {
    html.push_str(&format!("    <h2>{}</h2>\n", escape_html(heading)));
    html.push_str(&format!("    <pre>{}</pre>\n", escape_html(body)));
}

/// Generate complete HTML document
pub fn to_html(report: &Report) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n");

    html.push_str("<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!(
        "    <title>{}</title>\n",
        escape_html(&report.title)
    ));
    html.push_str("    <style>");
    html.push_str(generate_styles());
    html.push_str("</style>\n");
    html.push_str("</head>\n");

    html.push_str("<body>\n");
    html.push_str(&format!("    <h1>{}</h1>\n", escape_html(&report.title)));

    section(&mut html, "Initial data", &report.table.to_string());

    if let Some(verdict) = &report.verdict {
        let class = if verdict.is_normal() {
            "normal"
        } else {
            "not-normal"
        };
        html.push_str("    <h2>Normality check</h2>\n");
        html.push_str(&format!(
            "    <p class=\"verdict {}\">{}</p>\n",
            class,
            escape_html(&verdict.summary())
        ));
        html.push_str(&format!(
            "    <pre>{}</pre>\n",
            escape_html(&verdict.to_report_string())
        ));
    }

    if !report.descriptives.is_empty() {
        section(
            &mut html,
            "Descriptive statistics",
            &describe::to_report_string(&report.descriptives),
        );
    }

    section(
        &mut html,
        "Analysis results",
        &report.result.to_report_string(),
    );

    if !report.charts.is_empty() {
        html.push_str("    <h2>Charts</h2>\n");
        for chart in &report.charts {
            match &chart.svg {
                // plotters output is trusted markup
                Ok(svg) => {
                    html.push_str("    <div class=\"chart\">\n");
                    html.push_str(svg);
                    html.push_str("\n    </div>\n");
                }
                Err(_) => {
                    let note = chart.failure_note().unwrap_or_default();
                    html.push_str(&format!(
                        "    <p class=\"chart-error\">{}</p>\n",
                        escape_html(&note)
                    ));
                }
            }
        }
    }

    html.push_str("    <div class=\"footer\">\n");
    html.push_str(&format!(
        "        Generated by sad {}\n",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("    </div>\n");

    html.push_str("</body>\n");
    html.push_str("</html>\n");

    html
}
