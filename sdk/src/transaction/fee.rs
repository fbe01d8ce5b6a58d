//! Fee computation.
//!
//! The minimum fee is a static lookup: a base fee for the transaction's
//! `(type, subtype)` plus a fixed surcharge for every appendix present.
//! Nothing is computed from sizes or amounts.

use std::collections::HashMap;

use super::appendix::AppendixKind;
use super::builder::Transaction;
use super::types::Attachment;
use crate::config::{
    ASSET_ISSUANCE_FEE, ASSET_TRANSFER_FEE, DEFAULT_FEE, EFFECTIVE_BALANCE_LEASING_FEE,
    ORDER_CANCELLATION_FEE, ORDER_PLACEMENT_FEE, ENCRYPTED_MESSAGE_APPENDIX_FEE, MESSAGE_APPENDIX_FEE,
    PRIVATE_NAME_ANNOUNCEMENT_APPENDIX_FEE, PRIVATE_NAME_ASSIGNMENT_APPENDIX_FEE,
    PUBLIC_KEY_ANNOUNCEMENT_APPENDIX_FEE, PUBLIC_NAME_ANNOUNCEMENT_APPENDIX_FEE,
    PUBLIC_NAME_ASSIGNMENT_APPENDIX_FEE,
};

/// Base fees and appendix surcharges, in units.
///
/// `FeeSchedule::default()` is the chain's published table. Override
/// individual entries for test networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Base fee for any `(type, subtype)` without an override.
    pub default_fee: u64,
    /// Base fee overrides keyed by `(type, subtype)`.
    pub base_fees: HashMap<(u8, u8), u64>,
    /// Surcharge per appendix kind.
    pub appendix_fees: HashMap<AppendixKind, u64>,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let appendix_fees = AppendixKind::ALL
            .into_iter()
            .map(|kind| {
                let fee = match kind {
                    AppendixKind::PublicMessage => MESSAGE_APPENDIX_FEE,
                    AppendixKind::EncryptedMessage | AppendixKind::EncryptedMessageToSelf => {
                        ENCRYPTED_MESSAGE_APPENDIX_FEE
                    }
                    AppendixKind::PublicKeyAnnouncement => PUBLIC_KEY_ANNOUNCEMENT_APPENDIX_FEE,
                    AppendixKind::PrivateNameAnnouncement => PRIVATE_NAME_ANNOUNCEMENT_APPENDIX_FEE,
                    AppendixKind::PrivateNameAssignment => PRIVATE_NAME_ASSIGNMENT_APPENDIX_FEE,
                    AppendixKind::PublicNameAnnouncement => PUBLIC_NAME_ANNOUNCEMENT_APPENDIX_FEE,
                    AppendixKind::PublicNameAssignment => PUBLIC_NAME_ASSIGNMENT_APPENDIX_FEE,
                };
                (kind, fee)
            })
            .collect();

        let base_fees = HashMap::from([
            ((2, 0), ASSET_ISSUANCE_FEE),
            ((2, 2), ASSET_TRANSFER_FEE),
            ((2, 3), ORDER_PLACEMENT_FEE),
            ((2, 4), ORDER_PLACEMENT_FEE),
            ((2, 5), ORDER_CANCELLATION_FEE),
            ((2, 6), ORDER_CANCELLATION_FEE),
            ((4, 0), EFFECTIVE_BALANCE_LEASING_FEE),
        ]);

        Self {
            default_fee: DEFAULT_FEE,
            base_fees,
            appendix_fees,
        }
    }
}

impl FeeSchedule {
    /// Base fee for an attachment's `(type, subtype)`.
    pub fn base_fee(&self, attachment: &Attachment) -> u64 {
        self.base_fees
            .get(&(attachment.transaction_type(), attachment.subtype()))
            .copied()
            .unwrap_or(self.default_fee)
    }

    /// Surcharge for one appendix of `kind`.
    pub fn appendix_fee(&self, kind: AppendixKind) -> u64 {
        self.appendix_fees.get(&kind).copied().unwrap_or(0)
    }

    /// Base fee plus one surcharge per appendix in `appendices`.
    pub fn fee_for(&self, attachment: &Attachment, appendices: impl IntoIterator<Item = AppendixKind>) -> u64 {
        appendices
            .into_iter()
            .fold(self.base_fee(attachment), |acc, kind| {
                acc.saturating_add(self.appendix_fee(kind))
            })
    }

    /// Minimum fee the chain accepts for `tx`.
    pub fn minimum_fee(&self, tx: &Transaction) -> u64 {
        self.fee_for(&tx.attachment, tx.appendices.iter().map(|a| a.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::appendix::{Appendix, Message};
    use crate::transaction::builder::TransactionBuilder;
    use crate::crypto::{ObjectId, PublicKey};

    fn payment() -> Transaction {
        TransactionBuilder::payment(ObjectId(1), 5).build(PublicKey::from_bytes([9; 32]))
    }

    fn with_surcharge() -> FeeSchedule {
        let mut schedule = FeeSchedule::default();
        schedule
            .appendix_fees
            .insert(AppendixKind::PublicMessage, 250);
        schedule
    }

    #[test]
    fn default_table_matches_chain() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.minimum_fee(&payment()), 1_000_000);
        for kind in AppendixKind::ALL {
            assert_eq!(schedule.appendix_fee(kind), 0);
        }
    }

    #[test]
    fn colored_coins_base_fees() {
        let schedule = FeeSchedule::default();
        let issuance = Attachment::AssetIssuance {
            description_url: String::new(),
            description_hash: None,
            quantity: 1,
            decimals: 0,
            dillutable: false,
        };
        assert_eq!(schedule.base_fee(&issuance), 0);

        let order = crate::transaction::OrderPlacement {
            currency: ObjectId(1),
            asset: ObjectId(2),
            quantity: 1,
            price: 1,
            expiration: 1,
        };
        assert_eq!(schedule.base_fee(&Attachment::AskOrderPlacement(order)), 1_000_000);
        assert_eq!(schedule.base_fee(&Attachment::BidOrderPlacement(order)), 1_000_000);
        assert_eq!(
            schedule.base_fee(&Attachment::AskOrderCancellation { order: ObjectId(3) }),
            1_000_000
        );
        assert_eq!(
            schedule.base_fee(&Attachment::EffectiveBalanceLeasing { period: 10 }),
            1_000_000
        );
    }

    #[test]
    fn one_message_costs_one_surcharge() {
        let schedule = with_surcharge();
        let mut tx = payment();
        tx.appendices.push(Appendix::PublicMessage(Message::text("a")));
        assert_eq!(schedule.minimum_fee(&tx), DEFAULT_FEE + 250);
    }

    #[test]
    fn two_messages_cost_two_surcharges() {
        let schedule = with_surcharge();
        let mut tx = payment();
        tx.appendices.push(Appendix::PublicMessage(Message::text("a")));
        tx.appendices.push(Appendix::PublicMessage(Message::text("b")));
        assert_eq!(schedule.minimum_fee(&tx), DEFAULT_FEE + 500);
    }

    #[test]
    fn base_fee_override() {
        let mut schedule = FeeSchedule::default();
        schedule.base_fees.insert((2, 2), 7);
        let transfer = Attachment::AssetTransfer {
            asset: ObjectId(1),
            quantity: 1,
        };
        assert_eq!(schedule.base_fee(&transfer), 7);
        assert_eq!(schedule.base_fee(&Attachment::OrdinaryPayment), DEFAULT_FEE);
    }
}
