//! CSV export of query results.

use serde::Serialize;
use std::io::Write;

/// Writes an iterator of records to a CSV writer, header first.
/// Each record must implement Serialize.
pub fn write_csv<T, W>(writer: W, records: impl Iterator<Item = T>) -> csv::Result<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{
        Direction, InvoiceData, InvoiceType, Network, Payment, PaymentData, PaymentRow,
        PaymentStatus,
    };

    fn invoice(id: &str, amount: Option<u64>) -> Payment {
        Payment {
            id: id.to_string(),
            wallet_id: "w1".to_string(),
            status: PaymentStatus::Complete,
            timestamp: 1_700_000_000,
            amount,
            fee: None,
            network: Network::Bitcoin,
            data: PaymentData::Invoice(InvoiceData {
                direction: Direction::Receive,
                kind: InvoiceType::Bolt11,
                created_at: 1_700_000_000,
                completed_at: None,
                expires_at: None,
                hash: format!("hash-{}", id),
                request: None,
                node_id: "02ab".to_string(),
                description: None,
                preimage: None,
                pay_index: None,
                offer: None,
            }),
        }
    }

    #[test]
    fn test_write_payment_rows() -> csv::Result<()> {
        let mut output = Vec::new();
        let rows = vec![invoice("i1", Some(2_500)), invoice("i2", None)]
            .into_iter()
            .map(PaymentRow::from);
        write_csv(&mut output, rows)?;

        let expected = "id,type,wallet_id,status,timestamp,amount,fee
i1,invoice,w1,complete,1700000000,2500,
i2,invoice,w1,complete,1700000000,,
";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
        Ok(())
    }

    #[test]
    fn test_write_nothing() -> csv::Result<()> {
        let mut output = Vec::new();
        write_csv(&mut output, std::iter::empty::<PaymentRow>())?;
        assert!(output.is_empty());
        Ok(())
    }
}
