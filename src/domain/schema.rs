use crate::domain::model::{FieldSchema, FieldType, TableSchema};

/// Columns of the apartments.com listing-rank export, in warehouse order.
const RANKING_FIELDS: [(&str, FieldType); 13] = [
    ("city", FieldType::String),
    ("code", FieldType::String),
    ("image", FieldType::String),
    ("listings_url", FieldType::String),
    ("package", FieldType::String),
    ("package_rank", FieldType::Integer),
    ("rank", FieldType::Integer),
    ("rank_type", FieldType::String),
    ("site", FieldType::String),
    ("state", FieldType::String),
    ("type", FieldType::String),
    ("url", FieldType::String),
    ("zip", FieldType::String),
];

/// Schema used for both the landing and the transformed table.
///
/// The two tables hold different stages (raw vs. normalized) yet share this
/// one schema. Keep them identical unless the tables are meant to diverge.
pub fn ranking_schema() -> TableSchema {
    TableSchema {
        fields: RANKING_FIELDS
            .iter()
            .map(|(name, field_type)| FieldSchema {
                name: name.to_string(),
                field_type: *field_type,
            })
            .collect(),
    }
}
