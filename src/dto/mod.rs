//! Record shapes stored by the wallet data layer.

mod channel;
mod payment;
mod records;
mod row;

pub use channel::{Channel, ChannelKey, ChannelStatus, Party};
pub use payment::{
    AddressData, ChannelRef, ChannelTxType, Direction, InvoiceData, InvoiceType, Network, Offer,
    Payment, PaymentData, PaymentKey, PaymentStatus, PaymentType, TransactionData, TxInput,
    TxOutput,
};
pub use records::{Metadata, Trade, TradeSide, Wallet, WalletConfiguration, WalletType};
pub use row::PaymentRow;
