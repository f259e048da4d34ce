//! Display transforms shared by the table and the detail panel

const INCHES_PER_DECIMETER: f64 = 3.937;

/// Upper-cases the first character, leaves the rest alone.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn height_inches(decimeters: u32) -> String {
    format!("{:.2} Inches", f64::from(decimeters) * INCHES_PER_DECIMETER)
}

pub fn weight_kgs(hectograms: u32) -> String {
    format!("{:.2} KGs", f64::from(hectograms) / 10.0)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn type_line(types: &[String]) -> String {
    types
        .iter()
        .map(|name| capitalize(name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flavor text from the API carries hard line breaks and form feeds.
pub fn sanitize_text(text: &str) -> String {
    text.replace(['\n', '\u{000C}'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_in_inches() {
        assert_eq!(height_inches(7), "27.56 Inches");
        assert_eq!(height_inches(0), "0.00 Inches");
    }

    #[test]
    fn weight_in_kgs() {
        assert_eq!(weight_kgs(69), "6.90 KGs");
        assert_eq!(weight_kgs(9999), "999.90 KGs");
    }

    #[test]
    fn capitalizes_first_letter_only() {
        assert_eq!(capitalize("pikachu"), "Pikachu");
        assert_eq!(capitalize("mr-mime"), "Mr-mime");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn type_line_is_space_joined() {
        let types = vec!["grass".to_string(), "poison".to_string()];
        assert_eq!(type_line(&types), "Grass Poison");
        assert_eq!(type_line(&[]), "");
    }

    #[test]
    fn flags_render_as_yes_no() {
        assert_eq!(yes_no(true), "Yes");
        assert_eq!(yes_no(false), "No");
    }

    #[test]
    fn sanitize_strips_breaks() {
        assert_eq!(
            sanitize_text("A strange seed was\nplanted\u{000C}on its back."),
            "A strange seed was planted on its back."
        );
    }
}
