//! HTML rendering for the measurement form and prediction results

use iris_common::{Field, PredictionResult};

/// What the page shows above the (always empty) input form
#[derive(Debug, Clone, Copy)]
pub enum PageView<'a> {
    /// Fresh form
    Form,
    /// Error message from validation or prediction
    Message(&'a str),
    /// Successful prediction
    Result(&'a PredictionResult),
}

/// Escape text for safe inclusion in HTML element content and attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_form() -> String {
    let inputs: String = Field::ALL
        .iter()
        .map(|field| {
            format!(
                r#"
            <label for="{key}">{name} (cm)</label>
            <input type="number" step="any" min="0" max="10" id="{key}" name="{key}" required>"#,
                key = field.form_key(),
                name = field.display_name()
            )
        })
        .collect();

    format!(
        r#"
        <form method="post" action="/get_data">{inputs}
            <button type="submit" class="button">Predict</button>
        </form>"#
    )
}

fn render_message(message: &str) -> String {
    format!(
        r#"
        <div class="flash" role="alert">{}</div>"#,
        escape_html(message)
    )
}

fn render_result(result: &PredictionResult) -> String {
    let mut html = format!(
        r#"
        <section class="result">
            <h2>Predicted species: <span class="species">{}</span></h2>
            <p class="description">{}</p>"#,
        escape_html(&result.label),
        escape_html(&result.description)
    );

    if let Some(probabilities) = &result.probabilities {
        html.push_str(
            r#"
            <h3>Prediction probabilities</h3>
            <table class="probabilities">"#,
        );
        for p in probabilities {
            html.push_str(&format!(
                r#"
                <tr><td>{}</td><td>{}</td></tr>"#,
                escape_html(&p.label),
                escape_html(&p.percentage)
            ));
        }
        html.push_str(
            r#"
            </table>"#,
        );
    }

    html.push_str(
        r#"
            <h3>Input measurements</h3>
            <table class="measurements">"#,
    );
    for (field, value) in result.measurements.iter() {
        html.push_str(&format!(
            r#"
                <tr><td>{}</td><td>{} cm</td></tr>"#,
            field.display_name(),
            format_measurement(value)
        ));
    }
    html.push_str(
        r#"
            </table>
        </section>"#,
    );
    html
}

/// Shortest round-trip form that always keeps a decimal point (`10.0`, `5.1`)
fn format_measurement(value: f64) -> String {
    format!("{:?}", value)
}

/// Render the full page
pub fn render_page(view: PageView<'_>) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");

    let body = match view {
        PageView::Form => String::new(),
        PageView::Message(message) => render_message(message),
        PageView::Result(result) => render_result(result),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Iris Species Classifier</title>
    <style>
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }}
        h1 {{
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }}
        form {{
            display: grid;
            grid-template-columns: max-content 1fr;
            gap: 8px 16px;
            margin-bottom: 24px;
        }}
        .button {{
            grid-column: 2;
            justify-self: start;
            padding: 10px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
        }}
        .flash {{
            background: #fdecea;
            border: 1px solid #ef4444;
            color: #b91c1c;
            padding: 10px;
            border-radius: 4px;
            margin-bottom: 16px;
        }}
        .species {{
            color: #0066cc;
        }}
        td {{
            padding: 2px 12px 2px 0;
        }}
    </style>
</head>
<body>
    <h1>Iris Species Classifier</h1>
    <main>{body}{form}
    </main>
    <p><small>iris-web v{version} ({git_hash})</small></p>
</body>
</html>
"#,
        body = body,
        form = render_form(),
        version = version,
        git_hash = git_hash,
    )
}
