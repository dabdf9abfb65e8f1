pub const RECOGNIZE_FOOD: &str = include_str!("../data/prompts/recognize_food.txt");
pub const NUTRITION: &str = include_str!("../data/prompts/nutrition.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
