//! A minimal binary NBT writer, covering only the tag types this codec
//! actually emits: compounds, strings, and long arrays. There is no reader
//! here — nothing in this crate needs to parse NBT sent by a client.

use std::io::Write;

const TAG_END: u8 = 0x00;
const TAG_LONG_ARRAY: u8 = 0x0c;
const TAG_STRING: u8 = 0x08;
const TAG_COMPOUND: u8 = 0x0a;

fn write_nbt_string(s: &str, mut w: impl Write) -> std::io::Result<()> {
    let bytes = s.as_bytes();
    w.write_all(&(bytes.len() as u16).to_be_bytes())?;
    w.write_all(bytes)
}

/// A root-level compound tag containing named fields. Field order is
/// preserved on write.
#[derive(Default, Clone, Debug)]
pub struct Compound {
    fields: Vec<(String, Value)>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Writes this compound as a root tag: `TAG_Compound`, empty root name,
    /// the fields, then `TAG_End`.
    pub fn write_root(&self, mut w: impl Write) -> std::io::Result<()> {
        w.write_all(&[TAG_COMPOUND])?;
        write_nbt_string("", &mut w)?;
        for (name, value) in &self.fields {
            value.write_named(name, &mut w)?;
        }
        w.write_all(&[TAG_END])
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    String(String),
    LongArray(Vec<i64>),
    Compound(Compound),
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::LongArray(v)
    }
}

impl From<Compound> for Value {
    fn from(v: Compound) -> Self {
        Value::Compound(v)
    }
}

impl Value {
    fn write_named(&self, name: &str, mut w: impl Write) -> std::io::Result<()> {
        match self {
            Value::String(s) => {
                w.write_all(&[TAG_STRING])?;
                write_nbt_string(name, &mut w)?;
                write_nbt_string(s, &mut w)
            }
            Value::LongArray(longs) => {
                w.write_all(&[TAG_LONG_ARRAY])?;
                write_nbt_string(name, &mut w)?;
                w.write_all(&(longs.len() as i32).to_be_bytes())?;
                for v in longs {
                    w.write_all(&v.to_be_bytes())?;
                }
                Ok(())
            }
            Value::Compound(c) => {
                w.write_all(&[TAG_COMPOUND])?;
                write_nbt_string(name, &mut w)?;
                for (field_name, value) in &c.fields {
                    value.write_named(field_name, &mut w)?;
                }
                w.write_all(&[TAG_END])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_round_trip_shape() {
        let mut buf = Vec::new();
        Compound::new()
            .insert("text", "hello")
            .write_root(&mut buf)
            .unwrap();

        assert_eq!(buf[0], TAG_COMPOUND);
        // Empty root name: 2-byte zero length follows the root tag id.
        assert_eq!(&buf[1..3], &[0, 0]);
        // Trailing TAG_End.
        assert_eq!(*buf.last().unwrap(), TAG_END);
    }

    #[test]
    fn long_array_field_has_i32_count_prefix() {
        let mut buf = Vec::new();
        Compound::new()
            .insert("MOTION_BLOCKING", vec![1i64, 2, 3])
            .write_root(&mut buf)
            .unwrap();

        // tag(1) + root-name-len(2) + tag(1) + name-len(2) + name(15) + count(4) + 3*8
        let expected_len = 1 + 2 + 1 + 2 + "MOTION_BLOCKING".len() + 4 + 24 + 1;
        assert_eq!(buf.len(), expected_len);
    }
}
