mod parse_declarations;
