//! Response envelope construction.

use ledgerkit_core::{Error, Payload, Result, ResponseEnvelope};
use ledgerkit_store::TransactionContext;

/// Wrap `value` in an envelope stamped with the current transaction.
///
/// The count follows the payload: 0 for [`Payload::Absent`] (including a
/// `None` collection), the element count for a sequence, 1 otherwise.
///
/// ```
/// use ledgerkit::{get_return, Payload};
/// use ledgerkit::core::TxTimestamp;
/// use ledgerkit::store::MemoryLedger;
///
/// let ctx = MemoryLedger::new().context("tx-7", TxTimestamp::new(1_700_000_000, 0));
/// let env = get_return(&ctx, "ok", vec!["a", "b", "c"]).unwrap();
/// assert_eq!(env.count(), 3);
///
/// let env = get_return(&ctx, "ok", Payload::<()>::Absent).unwrap();
/// assert_eq!(env.count(), 0);
/// ```
pub fn get_return<C, T>(
    ctx: &C,
    message: &str,
    value: impl Into<Payload<T>>,
) -> Result<ResponseEnvelope<T>>
where
    C: TransactionContext + ?Sized,
{
    let timestamp = ctx.tx_timestamp().map_err(|e| {
        tracing::debug!(error = %e, "transaction timestamp unavailable");
        Error::access("时间戳获取错误")
    })?;

    let envelope = ResponseEnvelope::new(ctx.tx_id(), timestamp.unix_seconds(), message, value.into());
    tracing::debug!(
        tx_id = envelope.tx_id(),
        tx_time = envelope.tx_time(),
        count = envelope.count(),
        msg = envelope.message(),
        "response envelope"
    );
    Ok(envelope)
}
