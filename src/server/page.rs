pub const DEFAULT_JSON_EXAMPLE: &str = r#"{
  "users": [
    {
      "id": 101,
      "name": "Alice Johnson",
      "email": "alice@example.com",
      "is_active": true,
      "roles": ["admin", "developer"],
      "address": {"city": "New York", "zipcode": "10001"}
    },
    {
      "id": 102,
      "name": "Bob Smith",
      "email": "bob@example.com",
      "is_active": false,
      "roles": ["user"],
      "address": {"city": "Los Angeles", "zipcode": "90001"}
    }
  ]
}"#;

pub const OUTPUT_PLACEHOLDER: &str = "Your converted TOON output will appear here...";

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>JSON2Toon</title>
  <style>
    body { background: #191b22; color: #eaeefc; font-family: 'Inter', 'Segoe UI', sans-serif; margin: 0; }
    main { max-width: 1100px; margin: 0 auto; padding: 3rem 1rem; }
    h1 { text-align: center; }
    .panes { display: flex; gap: 1.5rem; flex-wrap: wrap; }
    .pane { flex: 1 1 420px; background: #22242c; border-radius: 24px; padding: 1.5rem; }
    textarea, pre { box-sizing: border-box; width: 100%; min-height: 225px; background: #191b22; color: #eaeefc; border: 1px solid #3a3d4a; border-radius: 8px; padding: .75rem; font-family: monospace; white-space: pre-wrap; }
    button { width: 100%; margin-top: 1rem; padding: .75rem; border: none; border-radius: 8px; background: linear-gradient(90deg,#a084fa,#7c3aed); color: #fff; font-weight: bold; cursor: pointer; }
  </style>
</head>
<body>
  <main>
    <h1>JSON2Toon</h1>
    <p style="text-align:center">Transform verbose JSON into token-efficient TOON with AI-powered conversion.</p>
    <div class="panes">
      <section class="pane">
        <h2>JSON Input</h2>
        <form id="convert-form">
          <textarea id="json-input" placeholder="Paste your JSON here...">"#;

const PAGE_MIDDLE: &str = r#"</textarea>
          <button type="submit">Convert to TOON</button>
        </form>
      </section>
      <section class="pane">
        <h2>TOON Output</h2>
        <pre id="toon-output">"#;

const PAGE_TAIL: &str = r#"</pre>
      </section>
    </div>
  </main>
  <script>
    document.getElementById("convert-form").onsubmit = async function (e) {
      e.preventDefault();
      const input = document.getElementById("json-input").value;
      const output = document.getElementById("toon-output");
      output.textContent = "Converting... please wait!";
      const resp = await fetch("/convert", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ json_input: input })
      });
      const data = await resp.json();
      output.textContent = data.toon_output;
    };
  </script>
</body>
</html>
"#;

/// Renders the page with `json_value` in the input box and the placeholder
/// in the output box.
pub fn render_page(json_value: &str) -> String {
    let mut page = String::with_capacity(
        PAGE_HEAD.len()
            + PAGE_MIDDLE.len()
            + PAGE_TAIL.len()
            + json_value.len()
            + OUTPUT_PLACEHOLDER.len(),
    );
    page.push_str(PAGE_HEAD);
    page.push_str(&escape_html(json_value));
    page.push_str(PAGE_MIDDLE);
    page.push_str(OUTPUT_PLACEHOLDER);
    page.push_str(PAGE_TAIL);
    page
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
