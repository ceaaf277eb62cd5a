use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    // The backend spells it this way.
    #[serde(default)]
    pub dificulty_id: Option<i64>,
    #[serde(default)]
    pub machine_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub description: String,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub dificulty_id: Option<i64>,
    pub machine_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Muscle {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificMuscle {
    pub id: i64,
    pub name: String,
    pub muscle_id: i64,
}

/// Links an exercise to a specific muscle with a 1-10 involvement rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMuscle {
    pub id: i64,
    pub exercise_id: i64,
    pub specific_muscle_id: i64,
    pub rate: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExerciseMuscle {
    pub exercise_id: i64,
    pub specific_muscle_id: i64,
    pub rate: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekDay {
    pub id: i64,
    pub name: String,
}

/// Payload for the catalog entities that only carry a name
/// (difficulties, muscles, tags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMachine {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpecificMuscle {
    pub name: String,
    pub muscle_id: i64,
}
