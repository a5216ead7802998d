//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use newsletter_render::utils::{create_data_url, is_data_url, resolve_url, Url};

    #[test]
    fn data_url_from_bytes() {
        assert_eq!(
            create_data_url("image/png; charset=binary", b"\x89PNG"),
            "data:image/png;base64,iVBORw=="
        );
    }

    #[test]
    fn data_url_without_media_type() {
        assert_eq!(
            create_data_url("", b"A"),
            "data:application/octet-stream;base64,QQ=="
        );
    }

    #[test]
    fn detects_data_urls() {
        assert!(is_data_url(" DATA:image/gif;base64,R0lGOD"));
        assert!(!is_data_url("https://example.org/data:x"));
    }

    #[test]
    fn resolves_relative_url() {
        let base = Url::parse("https://example.org/news/page.html").unwrap();

        assert_eq!(
            resolve_url(&base, "img/logo.png").unwrap().as_str(),
            "https://example.org/news/img/logo.png"
        );
        assert_eq!(
            resolve_url(&base, "https://cdn.example.org/a.png")
                .unwrap()
                .as_str(),
            "https://cdn.example.org/a.png"
        );
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
    use newsletter_render::error::RenderError;
    use newsletter_render::utils::{resolve_url, Url};

    #[test]
    fn unresolvable_url() {
        let base = Url::parse("https://example.org/").unwrap();

        assert!(matches!(
            resolve_url(&base, "http://[bad"),
            Err(RenderError::InvalidUrl { .. })
        ));
    }
}
