// src/chat/prompt.rs
// Consultant prompt assembly for a recommendation round.

use serde::Deserialize;

/// Persona line sent as the system message of every round.
pub const SYSTEM_PROMPT: &str = "You are a professional air-conditioning solution consultant. \
You analyze floor-plan images and produce personalized, practical configuration plans that \
respect the customer's actual needs and budget.";

/// Optional parameters supplied alongside the floor-plan image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationParams {
    pub room_count: Option<String>,
    pub orientation: Option<String>,
    pub requirements: Option<String>,
}

fn orientation_label(key: &str) -> &str {
    match key {
        "south" => "south-facing",
        "north" => "north-facing",
        "east" => "east-facing",
        "west" => "west-facing",
        "southeast" => "southeast-facing",
        "southwest" => "southwest-facing",
        "northeast" => "northeast-facing",
        "northwest" => "northwest-facing",
        other => other,
    }
}

/// Build the user prompt for the initial round: task framing, the optional
/// parameters, the required answer outline, and the knowledge base embedded
/// verbatim.
pub fn build_user_prompt(params: &RecommendationParams, knowledge_base: &str) -> String {
    let mut prompt = String::from(
        "Please analyze this floor-plan image as a professional air-conditioning \
consultant and provide a detailed configuration plan.",
    );

    if let Some(rooms) = params.room_count.as_deref().filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("\nNumber of rooms: {rooms}"));
    }
    if let Some(orientation) = params.orientation.as_deref().filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("\nMain orientation: {}", orientation_label(orientation)));
    }
    if let Some(requirements) = params.requirements.as_deref().filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("\nUsage requirements: {requirements}"));
    }

    prompt.push_str(
        "\n\nStructure the recommendation as follows:\n\n\
## Floor-plan analysis\n\
- Basic layout and estimated floor area\n\
- Function and characteristics of each room\n\
- How the orientation affects cooling and heating demand\n\n\
## Configuration plan\n\
### Recommended models\n\
- A suitable unit for each room (central / split / ducted / portable)\n\
- Why each model fits (capacity, energy rating, features)\n\n\
### Quantities\n\
- How many units each room needs and on what basis\n\n\
### Placement\n\
- The best installation position per room and why\n\n\
## Budget estimate\n\
- Equipment cost range\n\
- Installation cost range\n\
- Total budget range\n\n\
## Caveats\n\
- Installation notes\n\
- Usage advice\n\
- Maintenance advice\n\n\
Keep the plan professional, detailed and practical.",
    );

    if !knowledge_base.is_empty() {
        prompt.push_str("\n\nRecommend from the following catalog and reference cases:\n\n");
        prompt.push_str(knowledge_base);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_parameters() {
        let params = RecommendationParams {
            room_count: Some("3".into()),
            orientation: Some("southeast".into()),
            requirements: Some("quiet bedrooms".into()),
        };
        let prompt = build_user_prompt(&params, "");
        assert!(prompt.contains("Number of rooms: 3"));
        assert!(prompt.contains("Main orientation: southeast-facing"));
        assert!(prompt.contains("Usage requirements: quiet bedrooms"));
        assert!(prompt.contains("## Budget estimate"));
    }

    #[test]
    fn test_prompt_omits_empty_parameters() {
        let prompt = build_user_prompt(&RecommendationParams::default(), "");
        assert!(!prompt.contains("Number of rooms"));
        assert!(!prompt.contains("Main orientation"));
        assert!(!prompt.contains("Usage requirements"));
        assert!(prompt.contains("## Floor-plan analysis"));
    }

    #[test]
    fn test_knowledge_base_embedded_verbatim() {
        let kb = "## Products\n- Gree GMV-H180WL/A";
        let prompt = build_user_prompt(&RecommendationParams::default(), kb);
        assert!(prompt.contains(kb));
    }

    #[test]
    fn test_unknown_orientation_passes_through() {
        assert_eq!(orientation_label("skylight"), "skylight");
    }
}
