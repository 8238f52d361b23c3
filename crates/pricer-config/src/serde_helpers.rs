//! Serde helpers for configuration deserialization

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

use pricer_types::ChainId;

/// Custom deserializer for HashMap<ChainId, T> that handles string keys
pub fn deserialize_chain_id_map<'de, D, T>(deserializer: D) -> Result<HashMap<ChainId, T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let map = HashMap::<String, T>::deserialize(deserializer)?;

	map.into_iter()
		.map(|(k, v)| {
			k.parse::<u64>()
				.map(|id| (ChainId(id), v))
				.map_err(|_| serde::de::Error::custom(format!("Invalid chain ID: {}", k)))
		})
		.collect()
}

/// Custom serializer for HashMap<ChainId, T> that converts ChainId to string keys
pub fn serialize_chain_id_map<S, T>(
	map: &HashMap<ChainId, T>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
	T: Serialize,
{
	let string_map: HashMap<String, &T> = map.iter().map(|(k, v)| (k.0.to_string(), v)).collect();

	string_map.serialize(serializer)
}
