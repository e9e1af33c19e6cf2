pub const CHAT_TITLE_SYSTEM: &str = include_str!("../data/prompts/chat_title_system.txt");
pub const CHAT_TITLE_USER: &str = include_str!("../data/prompts/chat_title_user.txt");
pub const DESCRIPTION_SYSTEM: &str = include_str!("../data/prompts/description_system.txt");
pub const DESCRIPTION_USER: &str = include_str!("../data/prompts/description_user.txt");
pub const DOCUMENTARY_SYSTEM: &str = include_str!("../data/prompts/documentary_system.txt");
pub const DOCUMENTARY_USER: &str = include_str!("../data/prompts/documentary_user.txt");
pub const LESSONS_SYSTEM: &str = include_str!("../data/prompts/lessons_system.txt");
pub const LESSONS_USER: &str = include_str!("../data/prompts/lessons_user.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_multiple_vars() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "cats"), ("b", "dogs")]),
            "cats and dogs"
        );
    }

    #[test]
    fn test_prompts_are_non_empty() {
        for prompt in [
            CHAT_TITLE_SYSTEM,
            CHAT_TITLE_USER,
            DESCRIPTION_SYSTEM,
            DESCRIPTION_USER,
            DOCUMENTARY_SYSTEM,
            DOCUMENTARY_USER,
            LESSONS_SYSTEM,
            LESSONS_USER,
        ] {
            assert!(!prompt.trim().is_empty());
        }
    }

    #[test]
    fn test_user_templates_have_placeholders() {
        assert!(CHAT_TITLE_USER.contains("{{transcript}}"));
        assert!(DESCRIPTION_USER.contains("{{prompt}}"));
        assert!(DOCUMENTARY_USER.contains("{{histories}}"));
        assert!(LESSONS_USER.contains("{{histories}}"));
    }
}
