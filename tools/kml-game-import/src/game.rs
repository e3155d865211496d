use std::collections::HashSet;

use anyhow::{Context, Result};
use scavenger_core::game::{AnswerOption, Game, Location, QuestionType};

use crate::kml::Placemark;

pub const DONT_KNOW: &str = "I have no idea";

fn placeholder_location(name: String, placemark: &Placemark) -> Location {
    Location {
        question: format!("Question about {name}?"),
        name,
        latitude: placemark.latitude,
        longitude: placemark.longitude,
        question_type: QuestionType::MultipleChoice,
        image: String::new(),
        answer: vec![AnswerOption::new("Correct", 1), AnswerOption::new("Wrong", -1)],
        dont_know_answer: Some(AnswerOption::new(DONT_KNOW, 0)),
    }
}

/// First of `name`, `name (2)`, `name (3)`, ... not yet in `taken`
fn unique_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    (2..)
        .map(|n| format!("{name} ({n})"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Game skeleton with one placeholder question per placemark.
///
/// Repeated names get a ` (2)`, ` (3)`, ... suffix that is unique across
/// every name emitted so far.
pub fn build_game(placemarks: &[Placemark], radius: u32) -> Result<Game> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut locations = Vec::with_capacity(placemarks.len());

    for placemark in placemarks {
        let name = unique_name(&placemark.name, &taken);
        if name != placemark.name {
            log::warn!("Renaming duplicate placemark '{}' to '{}'", placemark.name, name);
        }

        taken.insert(name.clone());
        locations.push(placeholder_location(name, placemark));
    }

    let game = Game::new(locations, radius);
    game.validate().context("Generated game is invalid")?;
    Ok(game)
}
