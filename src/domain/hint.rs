//! Front-end registration hints for discovered components

use crate::domain::extractor::ComponentNameSet;

/// Renderer name for a component tag: `blog_post` → `BlogPost`, `mysore` → `Mysore`.
pub fn renderer_name(tag: &str) -> String {
    let name: String = tag
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    match name.chars().next() {
        None => "Component".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Component{name}"),
        Some(_) => name,
    }
}

/// Snippet for the front-end component mapping, one entry per tag.
pub fn registration_snippet(components: &ComponentNameSet) -> String {
    let mut out = String::from("components: {\n");
    for tag in components.iter() {
        out.push_str(&format!("  \"{}\": {},\n", tag, renderer_name(tag)));
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mysore", "Mysore")]
    #[case("blog_post", "BlogPost")]
    #[case("hero-banner", "HeroBanner")]
    #[case("2col", "Component2col")]
    #[case("__", "Component")]
    fn test_renderer_name(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(renderer_name(tag), expected);
    }

    #[test]
    fn given_components_when_building_snippet_then_lists_each_in_order() {
        let set: ComponentNameSet = ["mysore", "teaser"].into_iter().collect();

        let snippet = registration_snippet(&set);

        assert_eq!(
            snippet,
            "components: {\n  \"mysore\": Mysore,\n  \"teaser\": Teaser,\n}"
        );
    }
}
