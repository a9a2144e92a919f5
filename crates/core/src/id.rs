//! Strongly-typed identifiers for workflow engine entities.
//!
//! Each identifier wraps a [`uuid::Uuid`] behind [`domain_key::define_uuid!`],
//! which gives every id type its own marker: a `NodeId` and an `ExecutionId`
//! are both 16-byte `Copy` values, but the compiler will not let one stand in
//! for the other. All ids are `FromStr`/`Display` and round-trip through serde
//! as plain UUID strings.

use domain_key::define_uuid;

pub use domain_key::UuidParseError;

define_uuid!(WorkflowIdDomain => WorkflowId);
define_uuid!(NodeIdDomain => NodeId);
define_uuid!(ExecutionIdDomain => ExecutionId);
define_uuid!(NodeExecutionIdDomain => NodeExecutionId);
define_uuid!(OrganizationIdDomain => OrganizationId);
define_uuid!(DeploymentIdDomain => DeploymentId);
define_uuid!(ObjectIdDomain => ObjectId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_creates_non_nil_uuid() {
        assert!(!WorkflowId::v4().is_nil());
        assert!(!NodeId::v4().is_nil());
        assert!(!ExecutionId::v4().is_nil());
    }

    #[test]
    fn nil_is_all_zero() {
        let id = ObjectId::nil();
        assert!(id.is_nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn parse_roundtrips_through_display() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let id = NodeId::parse(raw).unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(NodeId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let id = ExecutionId::v4();
        let json = serde_json::to_string(&id).unwrap();
        let back: ExecutionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn distinct_domains_are_distinct_types() {
        fn accepts_node(_id: NodeId) {}
        fn accepts_execution(_id: ExecutionId) {}

        accepts_node(NodeId::v4());
        accepts_execution(ExecutionId::v4());
        // accepts_node(ExecutionId::v4()); // would not compile
    }

    #[test]
    fn ordering_and_hashing_are_consistent() {
        use std::collections::HashSet;
        let a = NodeId::nil();
        let b = NodeId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert!(a < b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&a));
    }
}
