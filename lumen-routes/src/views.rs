//! Server-rendered pages. Kept dependency-free: plain strings with escaped
//! interpolation.

use lumen_core::roadmap;
use lumen_database::model::user::User;
use lumen_llm::GenerationMode;
use lumen_utils::formatting::{escape_html, format_streak, format_xp, mode_display_name};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #0f1115; color: #e8e8ec; }
header { display: flex; gap: 1.5rem; align-items: center; padding: 1rem 2rem; background: #171a21; }
header .spacer { flex: 1; }
main { padding: 1rem 2rem; max-width: 960px; margin: 0 auto; }
a { color: #8ab4ff; }
.level h2 { margin-top: 2rem; }
.nodes { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 0.75rem; }
.node-card { padding: 0.75rem 1rem; border-radius: 8px; background: #1d212b; cursor: pointer; border: 1px solid #2a2f3a; }
.node-card.completed { border-color: #3fb950; }
.node-card .status { float: right; }
#panel { margin-top: 2rem; padding: 1rem; background: #171a21; border-radius: 8px; }
#panel-output { white-space: pre-wrap; }
.flash { color: #ff7b72; }
form.auth { display: flex; flex-direction: column; gap: 0.5rem; max-width: 320px; margin: 4rem auto; }
"#;

const SCRIPT: &str = r#"
const state = { nodeId: null, nodeTitle: null, card: null };
const contentCache = new Map();
const panel = document.getElementById('panel');
const panelTitle = document.getElementById('panel-title');
const output = document.getElementById('panel-output');
const xpDisplay = document.getElementById('xp-display');
const toast = document.getElementById('toast');

async function postJson(url, body) {
  const response = await fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  return response.json();
}

async function load(mode) {
  const cacheKey = `${state.nodeId}_${mode}`;
  if (contentCache.has(cacheKey)) {
    output.textContent = contentCache.get(cacheKey);
    return;
  }

  output.textContent = 'Loading...';
  try {
    const data = await postJson('/api/generate', { node_title: state.nodeTitle, mode });
    if (data.error) {
      output.textContent = `Error: ${data.error}. Please try again.`;
    } else {
      contentCache.set(cacheKey, data.content);
      output.textContent = data.content;
    }
  } catch (err) {
    output.textContent = `Error: ${err.message}. Please try again.`;
  }
}

document.querySelectorAll('.node-card').forEach((card) => {
  card.addEventListener('click', () => {
    state.nodeId = card.dataset.nodeId;
    state.nodeTitle = card.dataset.nodeTitle;
    state.card = card;
    panelTitle.textContent = state.nodeTitle;
    panel.hidden = false;
    load('eli5');
  });
});

document.querySelectorAll('.mode-btn').forEach((button) => {
  button.addEventListener('click', () => load(button.dataset.mode));
});

document.getElementById('complete-btn').addEventListener('click', async () => {
  try {
    const data = await postJson('/api/complete_node', { node_id: state.nodeId });
    if (data.success) {
      xpDisplay.textContent = `${data.xp} XP`;
      state.card.classList.add('completed');
      state.card.querySelector('.status').textContent = '✓';
      toast.textContent = data.message;
    } else {
      toast.textContent = data.error || 'Something went wrong.';
    }
  } catch (err) {
    toast.textContent = 'Connection error.';
  }
});
"#;

fn layout(title: &str, body: &str, script: Option<&str>) -> String {
    let mut page = String::with_capacity(body.len() + STYLE.len() + 512);
    page.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str(&format!("<title>{}</title>\n<style>", escape_html(title)));
    page.push_str(STYLE);
    page.push_str("</style>\n</head>\n<body>\n");
    page.push_str(body);
    if let Some(script) = script {
        page.push_str("<script>");
        page.push_str(script);
        page.push_str("</script>\n");
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn auth_page(title: &str, action: &str, flash: Option<&str>, alternate: (&str, &str)) -> String {
    let mut body = format!(
        "<form class=\"auth\" method=\"post\" action=\"{action}\">\n<h1>{}</h1>\n",
        escape_html(title)
    );
    if let Some(message) = flash {
        body.push_str(&format!(
            "<p class=\"flash\" role=\"alert\">{}</p>\n",
            escape_html(message)
        ));
    }
    body.push_str(
        "<input name=\"username\" placeholder=\"Username\" autocomplete=\"username\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\n",
    );
    body.push_str(&format!(
        "<button type=\"submit\">{}</button>\n<a href=\"{}\">{}</a>\n</form>\n",
        escape_html(title),
        alternate.0,
        escape_html(alternate.1)
    ));
    layout(title, &body, None)
}

pub fn login_page(flash: Option<&str>) -> String {
    auth_page("Log in", "/login", flash, ("/signup", "Create an account"))
}

pub fn signup_page(flash: Option<&str>) -> String {
    auth_page("Sign up", "/signup", flash, ("/login", "Already have an account?"))
}

pub fn main_page(user: &User, generation_enabled: bool) -> String {
    let mut body = format!(
        "<header>\n<strong>Lumen</strong>\n<span>{}</span>\n<span class=\"spacer\"></span>\n\
         <span id=\"xp-display\">{}</span>\n<span id=\"streak-display\">{}</span>\n\
         <a href=\"/logout\">Log out</a>\n</header>\n<main>\n",
        escape_html(&user.username),
        format_xp(user.xp),
        format_streak(user.streak)
    );

    for level in roadmap::levels() {
        body.push_str(&format!(
            "<section class=\"level\" id=\"level-{}\">\n<h2>{}</h2>\n<div class=\"nodes\">\n",
            escape_html(level.id),
            escape_html(level.title)
        ));
        for node in level.nodes {
            let completed = user.has_completed(node.id);
            body.push_str(&format!(
                "<div class=\"node-card{}\" data-node-id=\"{}\" data-node-title=\"{}\">\
                 <span class=\"status\">{}</span><h3>{}</h3><p>{}</p></div>\n",
                if completed { " completed" } else { "" },
                escape_html(node.id),
                escape_html(node.title),
                if completed { "✓" } else { "" },
                escape_html(node.title),
                escape_html(node.description)
            ));
        }
        body.push_str("</div>\n</section>\n");
    }

    body.push_str("<section id=\"panel\" hidden>\n<h2 id=\"panel-title\"></h2>\n<nav>\n");
    if generation_enabled {
        for mode in GenerationMode::ALL {
            body.push_str(&format!(
                "<button class=\"mode-btn\" data-mode=\"{}\">{}</button>\n",
                mode.as_str(),
                mode_display_name(mode.as_str())
            ));
        }
    } else {
        body.push_str("<p>Explanations are unavailable right now.</p>\n");
    }
    body.push_str(
        "</nav>\n<div id=\"panel-output\"></div>\n\
         <button id=\"complete-btn\">Mark complete</button>\n</section>\n\
         <p id=\"toast\" aria-live=\"polite\"></p>\n</main>\n",
    );

    layout("Lumen", &body, Some(SCRIPT))
}
