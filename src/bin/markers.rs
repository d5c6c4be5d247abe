//! markers.rs
//! Cliente de consola: carga los marcadores desde un servidor en marcha y,
//! opcionalmente, abre el panel de uno de ellos.
//! Uso: cargo run --bin markers -- [--url http://127.0.0.1:8080] [--select <n>]

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use std::io::Write;
use tracing_subscriber::EnvFilter;

use gangmap::models::types::MapCfg;
use gangmap::view::{MapView, DATA_PATH};

const USAGE: &str = "Usage: markers [--url <base>] [--select <index>]";

struct Args {
    url: String,
    select: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut out = Args { url: "http://127.0.0.1:8080".into(), select: None };
    let mut it = args.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--url" => {
                out.url = it.next().ok_or_else(|| anyhow!("--url requires a value"))?.clone();
            }
            "--select" => {
                let v = it.next().ok_or_else(|| anyhow!("--select requires a value"))?;
                out.select = Some(v.parse().with_context(|| format!("--select: índice inválido {v}"))?);
            }
            "-h" | "--help" => bail!(USAGE),
            other => bail!("flag desconocido {other}\n{USAGE}"),
        }
    }
    Ok(out)
}

/// Carga los marcadores y los escribe en `out`; con `select` abre el panel.
async fn run(args: &Args, client: &Client, out: &mut impl Write) -> Result<()> {
    let url = format!("{}{}", args.url.trim_end_matches('/'), DATA_PATH);
    let mut view = MapView::new(&MapCfg::default());
    view.load(client, &url).await;

    let visible: Vec<_> = view.visible_markers().collect();
    writeln!(out, "{} / {} marcadores visibles", visible.len(), view.markers().len())?;
    for (i, m) in &visible {
        writeln!(
            out,
            "{:>5}  {:>11.6} {:>11.6}  {}",
            i,
            m.lat,
            m.lng,
            m.details.get("gang_name").unwrap_or("")
        )?;
    }

    let Some(idx) = args.select else { return Ok(()) };
    let Some(panel) = view.click_marker(idx) else {
        bail!("el marcador {idx} no existe o no es visible");
    };
    writeln!(out)?;
    writeln!(out, "== {}", panel.title.as_deref().unwrap_or(""))?;
    for c in &panel.cards {
        writeln!(out, "  {:<16} {}", c.label, c.value.as_deref().unwrap_or(""))?;
    }
    writeln!(out, "centro: {:.6}, {:.6}", view.center.lat, view.center.lng)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = parse_args(&argv)?;
    let client = Client::builder().brotli(true).gzip(true).deflate(true).build()?;
    run(&args, &client, &mut std::io::stdout().lock()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(a: &[&str]) -> Vec<String> {
        std::iter::once("markers").chain(a.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn defaults_without_flags() {
        let a = parse_args(&argv(&[])).unwrap();
        assert_eq!(a.url, "http://127.0.0.1:8080");
        assert_eq!(a.select, None);
    }

    #[test]
    fn url_and_select() {
        let a = parse_args(&argv(&["--url", "http://h:1/", "--select", "3"])).unwrap();
        assert_eq!(a.url, "http://h:1/");
        assert_eq!(a.select, Some(3));
    }

    #[test]
    fn bad_flags_are_errors() {
        assert!(parse_args(&argv(&["--nope"])).is_err());
        assert!(parse_args(&argv(&["--select", "x"])).is_err());
        assert!(parse_args(&argv(&["--url"])).is_err());
    }

    const CSV: &str = "gang_name,Latitude,Longitude,Area Name,City,Keyword,Full Address\n\
Group A,31.52,74.35,Area 1,Lahore,Extortion,Street 1\n\
Group B,n/a,73.04,Area 2,Islamabad,Robbery,Street 2\n";

    /// Servidor real en un puerto libre; devuelve la base y el CSV (vivo mientras dure el test).
    async fn serve_csv() -> (String, tempfile::NamedTempFile) {
        use gangmap::models::types::AppCfg;
        use gangmap::server::api::{router, ApiState};
        use std::sync::Arc;

        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(CSV.as_bytes()).unwrap();
        let cfg = AppCfg { csv_path: f.path().to_path_buf(), ..AppCfg::default() };
        let app = router(ApiState { cfg: Arc::new(cfg) });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), f)
    }

    #[tokio::test]
    async fn lists_visible_markers_and_prints_selected_panel() {
        let (url, _csv) = serve_csv().await;
        let args = Args { url, select: Some(0) };
        let mut out = Vec::new();
        run(&args, &Client::new(), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1 / 2 marcadores visibles");
        assert_eq!(lines[1], "    0    31.520000   74.350000  Group A");
        assert!(text.contains("== Group A"));
        for card in ["Area Name:", "Area 1", "City", "Lahore", "Primary Offence", "Extortion", "Full Address", "Street 1"] {
            assert!(text.contains(card), "falta {card}");
        }
        assert!(text.contains("centro: 31.520000, 74.350000"));
        assert!(!text.contains("Group B"));
    }

    #[tokio::test]
    async fn selecting_hidden_or_missing_marker_fails() {
        let (url, _csv) = serve_csv().await;
        for idx in [1, 9] {
            let args = Args { url: url.clone(), select: Some(idx) };
            let mut out = Vec::new();
            let err = run(&args, &Client::new(), &mut out).await.unwrap_err();
            assert!(err.to_string().contains(&format!("marcador {idx}")));
            assert!(!String::from_utf8(out).unwrap().contains("=="));
        }
    }
}
