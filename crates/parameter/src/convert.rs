//! `toRuntime`/`toWire`: the conversions between the wire shape (object
//! references) and the runtime shape (bytes) for binary parameter kinds.
//! Every other kind passes through unchanged.

use flux_object_store::{ObjectBytes, ObjectStore};

use crate::error::ParameterError;
use crate::value::{BinaryValue, ParameterValue};

/// Resolves any [`BinaryValue::Ref`] in `value` to bytes by reading from
/// `store`. Literal scalars and JSON pass through untouched.
pub async fn to_runtime(
    name: &str,
    value: ParameterValue,
    store: &dyn ObjectStore,
    org_id: flux_core::OrganizationId,
) -> Result<ParameterValue, ParameterError> {
    let Some(binary) = value.as_binary() else {
        return Ok(value);
    };

    let r#ref = match binary {
        BinaryValue::Ref(r#ref) => r#ref.clone(),
        BinaryValue::Resolved { .. } | BinaryValue::Fresh(_) => return Ok(value),
    };

    let (data, mime_type) = store
        .get(org_id, r#ref.id)
        .await
        .map_err(|_| ParameterError::ObjectNotFound {
            name: name.to_string(),
            object_id: r#ref.id.to_string(),
        })?
        .ok_or_else(|| ParameterError::ObjectNotFound {
            name: name.to_string(),
            object_id: r#ref.id.to_string(),
        })?;

    Ok(value.with_binary(BinaryValue::Resolved {
        bytes: ObjectBytes { data, mime_type },
        source: r#ref,
    }))
}

/// Writes any bytes produced by a node into `store` and replaces them with
/// an [`BinaryValue::Ref`]. A value already in `Ref` form, or one resolved
/// from a reference and never modified, reproduces the same id instead of
/// minting a new one — this is what makes `toWire(toRuntime(ref)) == ref`
/// hold by id equality.
pub async fn to_wire(
    value: ParameterValue,
    store: &dyn ObjectStore,
    org_id: flux_core::OrganizationId,
    execution_id: flux_core::ExecutionId,
) -> Result<ParameterValue, ParameterError> {
    let Some(binary) = value.as_binary() else {
        return Ok(value);
    };

    let r#ref = match binary {
        BinaryValue::Ref(r#ref) => r#ref.clone(),
        BinaryValue::Resolved { source, .. } => source.clone(),
        BinaryValue::Fresh(bytes) => {
            let id = store
                .put(org_id, bytes.data.clone(), bytes.mime_type.clone(), Some(execution_id))
                .await
                .map_err(|_| ParameterError::Invalid {
                    name: "<output>".to_string(),
                    reason: "object store rejected the write".to_string(),
                })?;
            flux_object_store::ObjectRef::new(id, bytes.mime_type.clone())
        }
    };

    Ok(value.with_binary(BinaryValue::Ref(r#ref)))
}
