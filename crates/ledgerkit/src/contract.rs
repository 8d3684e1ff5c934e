//! Contract glue: the host-facing entry points and their configuration.

use serde::Serialize;

use ledgerkit_core::{Payload, Result, ResponseEnvelope, Validatable};
use ledgerkit_store::TransactionContext;

use crate::accessor;
use crate::response::get_return;

/// Version reported by [`Contract::get_version`] unless configured otherwise.
pub const DEFAULT_VERSION: &str = "v0.1.0";

/// Configuration for a [`Contract`].
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Version string reported by `init` and `get_version`.
    pub version: String,
    /// Log the JSON wire form of every envelope built by [`Contract::respond`].
    pub log_envelopes: bool,
    /// Run the required-field check in [`Contract::save_record`].
    pub check_required_on_save: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            log_envelopes: false,
            check_required_on_save: true,
        }
    }
}

/// The host-facing contract.
///
/// Holds configuration only. All state lives in the ledger behind the
/// transaction context passed to each call.
#[derive(Debug, Clone, Default)]
pub struct Contract {
    config: ContractConfig,
}

impl Contract {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Instantiation message.
    pub fn init(&self) -> String {
        tracing::info!(version = %self.config.version, "contract initialised");
        format!("初始化链码成功，版本号：{}", self.config.version)
    }

    pub fn get_version(&self) -> &str {
        &self.config.version
    }

    /// Store a record, checking required fields first when configured to.
    pub fn save_record<C, T>(&self, ctx: &C, key: &str, record: &T) -> Result<()>
    where
        C: TransactionContext + ?Sized,
        T: Serialize + Validatable,
    {
        if self.config.check_required_on_save {
            accessor::save_record(ctx, key, record)
        } else {
            accessor::save_data(ctx, key, record)
        }
    }

    /// Build a response envelope, logging its wire form when configured to.
    pub fn respond<C, T>(
        &self,
        ctx: &C,
        message: &str,
        value: impl Into<Payload<T>>,
    ) -> Result<ResponseEnvelope<T>>
    where
        C: TransactionContext + ?Sized,
        T: Serialize,
    {
        let envelope = get_return(ctx, message, value)?;
        if self.config.log_envelopes {
            tracing::info!(envelope = %envelope.to_json()?, "response");
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerkit_core::{required_fields, Error, TxTimestamp};
    use ledgerkit_store::MemoryLedger;

    #[derive(Serialize)]
    struct Asset {
        id: String,
        owner: String,
    }

    required_fields!(Asset {
        #[required] id,
        #[required] owner,
    });

    #[test]
    fn test_init_and_version() {
        let contract = Contract::default();
        assert_eq!(contract.init(), "初始化链码成功，版本号：v0.1.0");
        assert_eq!(contract.get_version(), "v0.1.0");

        let custom = Contract::new(ContractConfig {
            version: "v2.0.0".into(),
            ..ContractConfig::default()
        });
        assert_eq!(custom.get_version(), "v2.0.0");
    }

    #[test]
    fn test_save_record_respects_config() {
        let ctx = MemoryLedger::new().context("tx-c", TxTimestamp::new(9, 0));
        let asset = Asset { id: "a1".into(), owner: String::new() };

        let strict = Contract::default();
        let err = strict.save_record(&ctx, "a1", &asset).unwrap_err();
        assert_eq!(err, Error::Validation("字段owner为必须，请检查".into()));

        let lax = Contract::new(ContractConfig {
            check_required_on_save: false,
            ..ContractConfig::default()
        });
        lax.save_record(&ctx, "a1", &asset).unwrap();
        assert!(ctx.has_state("a1").unwrap());
    }

    #[test]
    fn test_respond_with_logging() {
        let ctx = MemoryLedger::new().context("tx-r", TxTimestamp::new(9, 0));
        let contract = Contract::new(ContractConfig {
            log_envelopes: true,
            ..ContractConfig::default()
        });
        let env = contract.respond(&ctx, "ok", vec![1, 2]).unwrap();
        assert_eq!(env.count(), 2);
    }
}
