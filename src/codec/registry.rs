//! Type registry - maps type URLs to message descriptors

use std::collections::HashMap;

use crate::codec::error::{CodecError, CodecResult};
use crate::codec::json::from_partial;
use crate::codec::schema::MessageDescriptor;
use crate::codec::value::DynamicMessage;
use crate::codec::wire::{decode, encode};
use crate::proto::{cosmos, intergamm, qbank, qoracle};

/// A message ready to be placed in a transaction body
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeObject {
    pub type_url: String,
    pub value: DynamicMessage,
}

impl EncodeObject {
    /// Pack into a `google.protobuf.Any`
    pub fn to_any(&self) -> CodecResult<DynamicMessage> {
        DynamicMessage::new(&cosmos::ANY)
            .with("type_url", self.type_url.as_str())?
            .with("value", encode(&self.value))
    }
}

/// Registry of message types indexed by type URL
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, &'static MessageDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every transaction message of the quasar chain modules
    pub fn quasar() -> Self {
        let mut registry = Self::new();
        for desc in qbank::MSGS
            .iter()
            .chain(qoracle::MSGS.iter())
            .chain(intergamm::MSGS.iter())
        {
            registry.register(desc);
        }
        registry
    }

    /// Register a message type; later registrations replace earlier ones
    pub fn register(&mut self, desc: &'static MessageDescriptor) {
        self.types.insert(desc.type_url(), desc);
    }

    pub fn lookup(&self, type_url: &str) -> Option<&'static MessageDescriptor> {
        self.types.get(type_url).copied()
    }

    /// Look up by short or fully-qualified name
    pub fn lookup_name(&self, name: &str) -> Option<&'static MessageDescriptor> {
        self.types
            .values()
            .copied()
            .find(|desc| desc.name() == name || desc.full_name == name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_urls(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Build an [`EncodeObject`] from a partial JSON value
    pub fn encode_object(&self, type_url: &str, value: &serde_json::Value) -> CodecResult<EncodeObject> {
        let desc = self
            .lookup(type_url)
            .ok_or_else(|| CodecError::UnknownType(type_url.to_string()))?;
        Ok(EncodeObject {
            type_url: type_url.to_string(),
            value: from_partial(desc, value)?,
        })
    }

    /// Decode the payload of a `google.protobuf.Any`
    pub fn unpack_any(&self, any: &DynamicMessage) -> CodecResult<EncodeObject> {
        let type_url = any
            .get("type_url")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let desc = self
            .lookup(&type_url)
            .ok_or_else(|| CodecError::UnknownType(type_url.clone()))?;
        let payload = any.get("value").and_then(|v| v.as_bytes()).unwrap_or_default();
        Ok(EncodeObject {
            value: decode(desc, payload)?,
            type_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quasar_registry_contents() {
        let registry = TypeRegistry::quasar();
        assert!(registry
            .lookup("/abag.quasarnode.qbank.MsgRequestDeposit")
            .is_some());
        assert!(registry
            .lookup("/abag.quasarnode.intergamm.MsgJoinPool")
            .is_some());
        assert!(registry
            .lookup("/abag.quasarnode.qoracle.MsgCreatePoolPosition")
            .is_some());
        assert!(registry.lookup("/abag.quasarnode.qbank.Deposit").is_none());
        assert_eq!(
            registry.lookup_name("MsgClaimRewards").map(|d| d.full_name),
            Some("abag.quasarnode.qbank.MsgClaimRewards")
        );
    }

    #[test]
    fn test_any_round_trip() {
        let registry = TypeRegistry::quasar();
        let obj = registry
            .encode_object(
                "/abag.quasarnode.qbank.MsgClaimRewards",
                &json!({ "creator": "quasar1xyz", "vaultID": "orion" }),
            )
            .unwrap();
        let any = obj.to_any().unwrap();
        assert_eq!(
            any.get("type_url").and_then(|v| v.as_str()),
            Some("/abag.quasarnode.qbank.MsgClaimRewards")
        );
        assert_eq!(registry.unpack_any(&any).unwrap(), obj);
    }

    #[test]
    fn test_unknown_type_url() {
        let registry = TypeRegistry::quasar();
        assert!(matches!(
            registry.encode_object("/nope.Msg", &json!({})),
            Err(CodecError::UnknownType(_))
        ));
    }
}
