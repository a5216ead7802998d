//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use newsletter_render::parsers::css::{parse_declarations, Declaration};

    #[test]
    fn parses_declaration_block() {
        let declarations = parse_declarations(
            "COLOR: red; font-family: \"Foo; Bar\", serif; margin: 0 !important; \
             background: url(\"a;b.png\")",
        );

        assert_eq!(
            declarations,
            vec![
                Declaration {
                    property: "color".to_string(),
                    value: "red".to_string(),
                    important: false,
                },
                Declaration {
                    property: "font-family".to_string(),
                    value: "\"Foo; Bar\", serif".to_string(),
                    important: false,
                },
                Declaration {
                    property: "margin".to_string(),
                    value: "0".to_string(),
                    important: true,
                },
                Declaration {
                    property: "background".to_string(),
                    value: "url(\"a;b.png\")".to_string(),
                    important: false,
                },
            ]
        );
    }

    #[test]
    fn serializes_without_important() {
        let declaration = Declaration::new("Color", "red !important").unwrap();

        assert!(declaration.important);
        assert_eq!(declaration.to_css(), "color: red;");
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
    use newsletter_render::parsers::css::{parse_declarations, Declaration};

    #[test]
    fn skips_invalid_declarations() {
        let declarations = parse_declarations("; bad; 12: px; color:; width: 10px");

        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].property, "width");
        assert_eq!(declarations[0].value, "10px");
    }

    #[test]
    fn empty_value() {
        assert!(Declaration::new("color", "  ").is_none());
        assert!(Declaration::new("color", "!important").is_none());
    }
}
