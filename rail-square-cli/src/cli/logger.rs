use serde::ser::{self, Serialize};
use std::io::Write;

#[derive(Debug)]
pub(crate) struct Error(std::io::Error);

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self(std::io::Error::other(msg.to_string()))
    }
}

/// A TOML-like record writer.
///
/// Top-level fields are written as `key=value` lines, nested structs use
/// dotted keys, and sequences are written inline as `[a, b]`.
pub(crate) struct Logger<'a, W: Write> {
    writer: &'a mut W,
    prec: usize,
    path: Vec<&'static str>,
    // Depth of inline values
    inline: usize,
    started: bool,
}

impl<'a, W: Write> Logger<'a, W> {
    pub(crate) fn new(writer: &'a mut W) -> Self {
        Self { writer, prec: 4, path: Vec::new(), inline: 0, started: false }
    }

    pub(crate) fn precision(self, prec: usize) -> Self {
        Self { prec, ..self }
    }

    /// Start a section, sections after the first are separated by a blank
    /// line.
    pub(crate) fn section(&mut self, title: &str) -> std::io::Result<()> {
        if self.started {
            writeln!(self.writer)?;
        }
        self.started = true;
        writeln!(self.writer, "[{title}]")
    }

    pub(crate) fn log<S: Serialize>(&mut self, s: S) -> std::io::Result<()> {
        self.started = true;
        s.serialize(&mut *self).map_err(|e| e.0)?;
        self.writer.flush()
    }

    fn key(&mut self) -> Result<(), Error> {
        if self.inline == 0 && !self.path.is_empty() {
            write!(self.writer, "{}=", self.path.join("."))?;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), Error> {
        if self.inline == 0 {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn scalar(&mut self, v: impl std::fmt::Display) -> Result<(), Error> {
        self.key()?;
        write!(self.writer, "{v}")?;
        self.end()
    }

    fn open(&mut self, head: &str) -> Result<(), Error> {
        self.key()?;
        write!(self.writer, "{head}")?;
        self.inline += 1;
        Ok(())
    }

    fn close(&mut self, tail: &str) -> Result<(), Error> {
        write!(self.writer, "{tail}")?;
        self.inline -= 1;
        self.end()
    }
}

macro_rules! impl_scalar {
    ($($method:ident($ty:ty)),+ $(,)?) => {$(
        fn $method(self, v: $ty) -> Result<(), Error> {
            self.scalar(v)
        }
    )+};
}

impl<'a, 'b, W: Write> ser::Serializer for &'a mut Logger<'b, W> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Seq<'a, 'b, W>;
    type SerializeTuple = Seq<'a, 'b, W>;
    type SerializeTupleStruct = Seq<'a, 'b, W>;
    type SerializeTupleVariant = Seq<'a, 'b, W>;
    type SerializeMap = Seq<'a, 'b, W>;
    type SerializeStruct = Fields<'a, 'b, W>;
    type SerializeStructVariant = Fields<'a, 'b, W>;

    impl_scalar! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_char(char),
        serialize_str(&str),
        serialize_unit_struct(&'static str),
    }

    fn serialize_f32(self, v: f32) -> Result<(), Error> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<(), Error> {
        let prec = self.prec;
        self.scalar(format_args!("{v:.prec$}"))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), Error> {
        v.serialize(self)
    }

    fn serialize_none(self) -> Result<(), Error> {
        // Skip the whole line
        if self.inline > 0 {
            write!(self.writer, "-")?;
        }
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Error> {
        self.scalar("-")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<(), Error> {
        self.scalar(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.open(&format!("{variant}("))?;
        value.serialize(&mut *self)?;
        self.close(")")
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Error> {
        self.open("[")?;
        Ok(Seq { logger: self, first: true, tail: "]" })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Error> {
        self.open(&format!("{variant}("))?;
        Ok(Seq { logger: self, first: true, tail: ")" })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Error> {
        self.open("{")?;
        Ok(Seq { logger: self, first: true, tail: "}" })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Error> {
        Fields::new(self, None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Error> {
        Fields::new(self, Some(variant))
    }
}

/// Inline sequence, tuple or map.
pub(crate) struct Seq<'a, 'b, W: Write> {
    logger: &'a mut Logger<'b, W>,
    first: bool,
    tail: &'static str,
}

impl<W: Write> Seq<'_, '_, W> {
    fn sep(&mut self) -> Result<(), Error> {
        if !std::mem::take(&mut self.first) {
            write!(self.logger.writer, ", ")?;
        }
        Ok(())
    }

    fn element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.sep()?;
        value.serialize(&mut *self.logger)
    }
}

macro_rules! impl_seq {
    ($($ty:ident::$method:ident),+ $(,)?) => {$(
        impl<W: Write> ser::$ty for Seq<'_, '_, W> {
            type Ok = ();
            type Error = Error;

            fn $method<T>(&mut self, value: &T) -> Result<(), Error>
            where
                T: ?Sized + Serialize,
            {
                self.element(value)
            }

            fn end(self) -> Result<(), Error> {
                self.logger.close(self.tail)
            }
        }
    )+};
}

impl_seq! {
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field,
}

impl<W: Write> ser::SerializeMap for Seq<'_, '_, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.element(key)?;
        write!(self.logger.writer, ": ")?;
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(&mut *self.logger)
    }

    fn end(self) -> Result<(), Error> {
        self.logger.close(self.tail)
    }
}

/// Struct fields, as dotted keys at the top level or inline in a sequence.
pub(crate) struct Fields<'a, 'b, W: Write> {
    logger: &'a mut Logger<'b, W>,
    first: bool,
    variant: Option<&'static str>,
}

impl<'a, 'b, W: Write> Fields<'a, 'b, W> {
    fn new(logger: &'a mut Logger<'b, W>, variant: Option<&'static str>) -> Result<Self, Error> {
        if logger.inline > 0 {
            if let Some(variant) = variant {
                write!(logger.writer, "{variant}")?;
            }
            write!(logger.writer, "(")?;
        } else if let Some(variant) = variant {
            logger.path.push(variant);
        }
        Ok(Self { logger, first: true, variant })
    }
}

macro_rules! impl_fields {
    ($($ty:ident),+ $(,)?) => {$(
        impl<W: Write> ser::$ty for Fields<'_, '_, W> {
            type Ok = ();
            type Error = Error;

            fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
            where
                T: ?Sized + Serialize,
            {
                let logger = &mut *self.logger;
                if logger.inline > 0 {
                    if !std::mem::take(&mut self.first) {
                        write!(logger.writer, ", ")?;
                    }
                    write!(logger.writer, "{key}=")?;
                    return value.serialize(logger);
                }
                logger.path.push(key);
                let res = value.serialize(&mut *logger);
                logger.path.pop();
                res
            }

            fn end(self) -> Result<(), Error> {
                if self.logger.inline > 0 {
                    write!(self.logger.writer, ")")?;
                } else if self.variant.is_some() {
                    self.logger.path.pop();
                }
                Ok(())
            }
        }
    )+};
}

impl_fields!(SerializeStruct, SerializeStructVariant);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Inner {
        a: f64,
        tag: Option<u8>,
    }

    #[derive(serde::Serialize)]
    struct Record {
        name: &'static str,
        inner: Inner,
        pts: [[f64; 2]; 2],
        items: Vec<Inner>,
    }

    fn log<S: Serialize>(s: S) -> String {
        let mut buf = Vec::new();
        let mut logger = Logger::new(&mut buf).precision(2);
        logger.section("record").unwrap();
        logger.log(s).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn dotted_keys() {
        let record = Record {
            name: "test",
            inner: Inner { a: 1., tag: None },
            pts: [[0., 1.], [2., 3.]],
            items: vec![Inner { a: 0.5, tag: Some(3) }],
        };
        let expected = "[record]\n\
            name=test\n\
            inner.a=1.00\n\
            pts=[[0.00, 1.00], [2.00, 3.00]]\n\
            items=[(a=0.50, tag=3)]\n";
        assert_eq!(log(record), expected);
    }

    #[test]
    fn sections() {
        let mut buf = Vec::new();
        let mut logger = Logger::new(&mut buf);
        logger.section("a").unwrap();
        logger.log(1.5).unwrap();
        logger.section("b").unwrap();
        logger.log(rail_square::Strategy::Hybrid).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[a]\n1.5000\n\n[b]\nHybrid\n");
    }
}
