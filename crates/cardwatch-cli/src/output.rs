use std::io::Write;

use cardwatch_monitor::{CardSink, MonitorReport};
use cardwatch_protocol::CardInfo;
use tracing::warn;

use crate::cli::OutputFormat;

const SEPARATOR: &str = "============================================================";

/// Prints each card to stdout.
pub struct ConsoleSink<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Print the end-of-session summary.
    pub fn finish(&mut self, report: &MonitorReport) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}\n{}", SEPARATOR, report)?,
            OutputFormat::Json => match serde_json::to_string(report) {
                Ok(json) => writeln!(self.out, "{}", json)?,
                Err(e) => warn!(error = %e, "Failed to serialize report"),
            },
            // Keep the stream to card values only.
            OutputFormat::Decimal => {}
        }
        self.out.flush()
    }

    fn write_card(&mut self, card: &CardInfo) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", SEPARATOR)?;
                writeln!(self.out, "Card #{}", card.sequence)?;
                write!(self.out, "{}", card)?;
            }
            OutputFormat::Json => {
                let json = serde_json::to_string(card).map_err(std::io::Error::other)?;
                writeln!(self.out, "{}", json)?;
            }
            OutputFormat::Decimal => match card.decimal_for_output() {
                Some(decimal) => writeln!(self.out, "{}", decimal)?,
                None => {
                    warn!(
                        sequence = card.sequence,
                        decimal = %card.decimal,
                        "Skipping card without a decimal value"
                    );
                    return Ok(());
                }
            },
        }
        self.out.flush()
    }
}

impl<W: Write> CardSink for ConsoleSink<W> {
    fn deliver(&mut self, card: &CardInfo) {
        if let Err(e) = self.write_card(card) {
            warn!(sequence = card.sequence, error = %e, "Failed to print card");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardwatch_core::{ConversionError, RawFrame};

    fn card() -> CardInfo {
        CardInfo::builder(RawFrame::new(b"CAB9EAF2\r\n".to_vec()).unwrap())
            .sequence(1)
            .build()
    }

    #[test]
    fn test_text_output() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Text);
        sink.deliver(&card());

        let printed = String::from_utf8(sink.out).unwrap();
        assert!(printed.contains("Card #1"));
        assert!(printed.contains("Card Type: Hexadecimal RFID"));
        assert!(printed.contains("Decimal Data: 3401181938"));
    }

    #[test]
    fn test_json_output_is_one_line() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Json);
        sink.deliver(&card());

        let printed = String::from_utf8(sink.out).unwrap();
        assert_eq!(printed.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(printed.trim()).unwrap();
        assert_eq!(value["sequence"], 1);
        assert_eq!(value["record"]["kind"], "hexadecimal_rfid");
    }

    #[test]
    fn test_decimal_output_prints_value_only() {
        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Decimal);
        sink.deliver(&card());

        assert_eq!(String::from_utf8(sink.out).unwrap(), "3401181938\n");
    }

    #[test]
    fn test_decimal_output_skips_failed_conversion() {
        let mut failed = card();
        let error = ConversionError::not_hex("CAB9EAF2");
        failed.decimal = error.sentinel().to_string();
        failed.conversion_error = Some(error);

        let mut sink = ConsoleSink::new(Vec::new(), OutputFormat::Decimal);
        sink.deliver(&failed);
        sink.deliver(&card());

        assert_eq!(String::from_utf8(sink.out).unwrap(), "3401181938\n");
    }
}
