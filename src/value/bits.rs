//! Bit operations on bits values and on octet strings used as bitmaps.

use super::build::Builder;
use super::{Data, RawValue, TypedValue};
use crate::bitset::Bitmap;
use crate::error::{Error, Result};
use std::collections::BTreeSet;

impl TypedValue {
    /// Whether every listed bit is set.
    ///
    /// Bits values take numbers or labels; an unknown bit is an error.
    /// Octet strings take bit numbers only.
    pub fn has_bits(&self, bits: impl Into<RawValue>) -> Result<bool> {
        match &self.data {
            Data::Bits(set) => {
                let wanted = Builder::new(&self.schema)?.bits(bits.into())?;
                Ok(wanted.is_subset(set))
            }
            Data::OctetString(bytes) => {
                let wanted = self.bit_numbers(bits.into())?;
                Ok(Bitmap::from_bytes(bytes.to_vec()).test_all(wanted))
            }
            _ => Err(self.no_bit_operations()),
        }
    }

    /// Like [`has_bits`](Self::has_bits), but unknown bits or unsupported
    /// kinds answer `false`.
    pub fn has_bits_lenient(&self, bits: impl Into<RawValue>) -> bool {
        self.has_bits(bits).unwrap_or(false)
    }

    /// Set bits (`|=`). Octet strings grow as needed.
    pub fn add_bits(&mut self, bits: impl Into<RawValue>) -> Result<()> {
        match &mut self.data {
            Data::Bits(set) => {
                let extra = Builder::new(&self.schema)?.bits(bits.into())?;
                set.extend(extra);
                Ok(())
            }
            Data::OctetString(bytes) => {
                let mut bitmap = Bitmap::from_bytes(bytes.to_vec());
                bitmap.add(self.bit_numbers(bits.into())?);
                self.set(bitmap.into_bytes())
            }
            _ => Err(self.no_bit_operations()),
        }
    }

    /// Clear bits (`-=`). Bits that are not set are ignored.
    pub fn remove_bits(&mut self, bits: impl Into<RawValue>) -> Result<()> {
        match &mut self.data {
            Data::Bits(set) => {
                let gone = Builder::new(&self.schema)?.bits(bits.into())?;
                set.retain(|bit| !gone.contains(bit));
                Ok(())
            }
            Data::OctetString(bytes) => {
                let mut bitmap = Bitmap::from_bytes(bytes.to_vec());
                bitmap.remove(self.bit_numbers(bits.into())?);
                self.set(bitmap.into_bytes())
            }
            _ => Err(self.no_bit_operations()),
        }
    }

    /// Bit numbers for octet-string bit operations. Labels have no meaning here.
    fn bit_numbers(&self, raw: RawValue) -> Result<BTreeSet<u32>> {
        let items = match raw {
            RawValue::List(items) => items,
            single => vec![single],
        };
        items
            .into_iter()
            .map(|item| match item {
                RawValue::Int(v) => u32::try_from(v).map_err(|_| {
                    Error::invalid_value(
                        self.schema.qualified_name(),
                        crate::error::ValueErrorKind::NumberTooLarge,
                    )
                }),
                _ => Err(Error::not_implemented("bit labels", self.kind().name())),
            })
            .collect()
    }

    fn no_bit_operations(&self) -> Error {
        Error::not_implemented("bit operations", self.kind().name())
    }
}
