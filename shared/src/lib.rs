use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Body returned by `POST /predict`, discriminated by its `status` field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictResponse {
    Success {
        #[serde(default)]
        food_name: Option<String>,
        #[serde(default, deserialize_with = "nutrition_object")]
        nutrition: Option<NutritionFacts>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

/// Nutrition record as reported by the service. Every field may be absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NutritionFacts {
    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbohydrates_total_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cholesterol_mg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fat_total_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fat_saturated_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fiber_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub potassium_mg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub serving_size_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sodium_mg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sugar_g: Option<f64>,
}

// The upstream nutrition API puts strings such as "Only available for premium
// subscribers." in place of numbers; those count as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(value)) => Some(value),
        Some(Lenient::Other(_)) | None => None,
    })
}

// Only a JSON object (or null) is a nutrition record. Without this, serde would
// also fill the fields positionally from an array.
fn nutrition_object<'de, D>(deserializer: D) -> Result<Option<NutritionFacts>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ObjectOnly;

    impl<'de> Visitor<'de> for ObjectOnly {
        type Value = Option<NutritionFacts>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a nutrition object or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            NutritionFacts::deserialize(de::value::MapAccessDeserializer::new(map)).map(Some)
        }
    }

    deserializer.deserialize_option(ObjectOnly)
}

impl NutritionFacts {
    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Carbohydrates => self.carbohydrates_total_g,
            Nutrient::Cholesterol => self.cholesterol_mg,
            Nutrient::TotalFat => self.fat_total_g,
            Nutrient::SaturatedFat => self.fat_saturated_g,
            Nutrient::Fiber => self.fiber_g,
            Nutrient::Potassium => self.potassium_mg,
            Nutrient::Protein => self.protein_g,
            Nutrient::ServingSize => self.serving_size_g,
            Nutrient::Sodium => self.sodium_mg,
            Nutrient::Sugar => self.sugar_g,
        }
    }

    /// All eleven rows in display order, absent values included.
    pub fn rows(&self) -> impl Iterator<Item = (Nutrient, Option<f64>)> + '_ {
        Nutrient::iter().map(move |nutrient| (nutrient, self.get(nutrient)))
    }

    pub fn is_complete(&self) -> bool {
        self.rows().all(|(_, value)| value.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Nutrient {
    #[strum(serialize = "Calories")]
    Calories,
    #[strum(serialize = "Carbohydrates")]
    Carbohydrates,
    #[strum(serialize = "Cholesterol")]
    Cholesterol,
    #[strum(serialize = "Total Fat")]
    TotalFat,
    #[strum(serialize = "Saturated Fat")]
    SaturatedFat,
    #[strum(serialize = "Fiber")]
    Fiber,
    #[strum(serialize = "Potassium")]
    Potassium,
    #[strum(serialize = "Protein")]
    Protein,
    #[strum(serialize = "Serving Size")]
    ServingSize,
    #[strum(serialize = "Sodium")]
    Sodium,
    #[strum(serialize = "Sugar")]
    Sugar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Unit {
    #[strum(serialize = "")]
    Unitless,
    #[strum(serialize = "g")]
    Grams,
    #[strum(serialize = "mg")]
    Milligrams,
}

impl Nutrient {
    pub fn unit(self) -> Unit {
        match self {
            Nutrient::Calories => Unit::Unitless,
            Nutrient::Cholesterol | Nutrient::Potassium | Nutrient::Sodium => Unit::Milligrams,
            _ => Unit::Grams,
        }
    }

    pub fn wire_key(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Carbohydrates => "carbohydrates_total_g",
            Nutrient::Cholesterol => "cholesterol_mg",
            Nutrient::TotalFat => "fat_total_g",
            Nutrient::SaturatedFat => "fat_saturated_g",
            Nutrient::Fiber => "fiber_g",
            Nutrient::Potassium => "potassium_mg",
            Nutrient::Protein => "protein_g",
            Nutrient::ServingSize => "serving_size_g",
            Nutrient::Sodium => "sodium_mg",
            Nutrient::Sugar => "sugar_g",
        }
    }

    /// Renders a value with its unit, or `-` when the service left it out.
    pub fn format_value(self, value: Option<f64>) -> String {
        match (value, self.unit()) {
            (None, _) => "-".to_string(),
            (Some(v), Unit::Unitless) => format!("{}", v),
            (Some(v), unit) => format!("{} {}", v, unit),
        }
    }
}
