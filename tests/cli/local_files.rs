//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use assert_cmd::prelude::*;
    use std::env;
    use std::fs;
    use std::process::Command;
    use std::time::Duration;
    use tempfile::tempdir;

    use crate::common::{serve_once, stylesheet};

    #[test]
    fn renders_local_file_with_stylesheets() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(
            &page,
            "<p class=\"intro\">Hi {NAME}</p>\n<a href=\"mailto:%7BEMAIL%7D\">Mail</a>",
        )
        .unwrap();
        let first = stylesheet(dir.path(), "first.css", ".intro { color: red; }");
        let second = stylesheet(dir.path(), "second.css", ".intro { color: blue; }");

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .env_remove("NEWSLETTER_CSS_FILES")
            .arg("--silent")
            .arg("--css")
            .arg(&first)
            .arg("--css")
            .arg(&second)
            .arg(&page)
            .output()
            .unwrap();

        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("<p style=\"color: red;\">Hi {NAME}</p><a href=\"mailto:{EMAIL}\">Mail</a>"));
        assert_eq!(String::from_utf8_lossy(&out.stderr), "");

        out.assert().code(0);
    }

    #[test]
    fn stylesheets_from_environment() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<h1>Title</h1>").unwrap();
        let css = stylesheet(dir.path(), "env.css", "h1 { font-size: 20px; }");

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .env("NEWSLETTER_CSS_FILES", &css)
            .arg("--silent")
            .arg(&page)
            .output()
            .unwrap();

        assert!(String::from_utf8_lossy(&out.stdout).contains("<h1 style=\"font-size: 20px;\">Title</h1>"));
        out.assert().code(0);
    }

    #[test]
    fn writes_output_file() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("page.html");
        let output = dir.path().join("newsletter.html");
        fs::write(&page, "<p>\tHello</p>  \n  <p>World</p>").unwrap();

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .env_remove("NEWSLETTER_CSS_FILES")
            .args(["--silent", "--output"])
            .arg(&output)
            .arg(&page)
            .output()
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&out.stdout), "");
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "<p> Hello</p><p>World</p>"
        );
        out.assert().code(0);
    }

    #[test]
    fn reads_config_file() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<table><tr><td>x</td></tr></table>").unwrap();
        let css = stylesheet(dir.path(), "table.css", "table { width: 600px; }");
        let config = dir.path().join("render.toml");
        fs::write(
            &config,
            format!(
                "css_files = [{:?}]\nconvert_visual_attributes = false\n",
                css.display().to_string()
            ),
        )
        .unwrap();

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .env_remove("NEWSLETTER_CSS_FILES")
            .arg("--silent")
            .arg("--config")
            .arg(&config)
            .arg(&page)
            .output()
            .unwrap();

        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("style=\"width: 600px;\""));
        assert!(!stdout.contains("width=\"600\""));
        out.assert().code(0);
    }

    #[test]
    fn locale_from_languages_table() {
        let (url, request) = serve_once("200 OK", "text/html; charset=utf-8", b"<p>Hallo</p>");
        let dir = tempdir().unwrap();
        let config = dir.path().join("newsletter.toml");
        fs::write(
            &config,
            format!(
                "base_url = \"http://127.0.0.1:9/\"\n\n[languages]\nde = {:?}\n",
                url.join("/de/").unwrap().to_string()
            ),
        )
        .unwrap();

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .env_remove("NEWSLETTER_BASE_URL")
            .env_remove("NEWSLETTER_CSS_FILES")
            .arg("--silent")
            .arg("--config")
            .arg(&config)
            .args(["--page", "42", "--locale", "de"])
            .output()
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&out.stdout), "<p>Hallo</p>\n");
        out.assert().code(0);

        let request = request
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
            .to_lowercase();
        assert!(request.starts_with("get /de/?id=42&type=1716283827 "));
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use assert_cmd::prelude::*;
    use std::env;
    use std::fs;
    use std::process::Command;
    use tempfile::tempdir;

    use crate::common::stylesheet;

    #[test]
    fn missing_input_file() {
        let dir = tempdir().unwrap();

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg("--silent")
            .arg(dir.path().join("missing.html"))
            .output()
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&out.stdout), "");
        assert!(!out.stderr.is_empty());
        out.assert().code(1);
    }

    #[test]
    fn malformed_selector() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<p>x</p>").unwrap();
        let css = stylesheet(dir.path(), "broken.css", "p..x { color: red; }");

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .arg("--silent")
            .arg("--css")
            .arg(&css)
            .arg(&page)
            .output()
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&out.stdout), "");
        assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid CSS selector: p..x"));
        out.assert().code(1);
    }

    #[test]
    fn zero_timeout() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<p>x</p>").unwrap();

        Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .args(["--silent", "--timeout", "0"])
            .arg(&page)
            .assert()
            .code(1);
    }

    #[test]
    fn invalid_timeout_in_environment() {
        let dir = tempdir().unwrap();
        let page = dir.path().join("page.html");
        fs::write(&page, "<p>x</p>").unwrap();

        let out = Command::cargo_bin(env!("CARGO_PKG_NAME"))
            .unwrap()
            .env("NEWSLETTER_FETCH_TIMEOUT", "soon")
            .arg("--silent")
            .arg(&page)
            .output()
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&out.stdout), "");
        assert!(String::from_utf8_lossy(&out.stderr).contains("NEWSLETTER_FETCH_TIMEOUT"));
        out.assert().code(1);
    }
}
