use std::borrow::Cow;

use num_derive::FromPrimitive;

/// AMF0 marker types.
/// Defined in amf0_spec_121207.pdf section 2.1
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive)]
#[repr(u8)]
pub enum Amf0Marker {
    /// number-marker
    Number = 0x00,
    /// boolean-marker
    Boolean = 0x01,
    /// string-marker
    String = 0x02,
    /// object-marker
    Object = 0x03,
    /// movieclip-marker
    ///
    /// reserved, not supported
    MovieClipMarker = 0x04,
    /// null-marker
    Null = 0x05,
    /// undefined-marker
    Undefined = 0x06,
    /// reference-marker
    Reference = 0x07,
    /// ecma-array-marker
    EcmaArray = 0x08,
    /// object-end-marker
    ObjectEnd = 0x09,
    /// strict-array-marker
    StrictArray = 0x0a,
    /// date-marker
    Date = 0x0b,
    /// long-string-marker
    LongString = 0x0c,
    /// unsupported-marker
    Unsupported = 0x0d,
    /// recordset-marker
    ///
    /// reserved, not supported
    Recordset = 0x0e,
    /// xml-document-marker
    XmlDocument = 0x0f,
    /// typed-object-marker
    TypedObject = 0x10,
    /// avmplus-object-marker
    ///
    /// AMF3 marker
    AVMPlusObject = 0x11,
}

/// Ordered key/value pairs of an AMF0 object or ECMA array.
pub type Amf0Properties<'a> = Vec<(Cow<'a, str>, Amf0Value<'a>)>;

/// AMF0 value types.
///
/// Only the types that show up in FLV script data are decoded. Every other
/// marker is kept as [`Amf0Value::Unsupported`] so that the surrounding
/// structure can still be returned.
#[derive(PartialEq, Clone, Debug)]
pub enum Amf0Value<'a> {
    /// Number Type defined section 2.2
    Number(f64),
    /// Boolean Type defined section 2.3
    Boolean(bool),
    /// String Type defined section 2.4
    String(Cow<'a, str>),
    /// Object Type defined section 2.5
    Object(Amf0Properties<'a>),
    /// ECMA Array Type defined section 2.10
    EcmaArray(Amf0Properties<'a>),
    /// StrictArray Type defined section 2.12
    StrictArray(Vec<Amf0Value<'a>>),
    /// Placeholder for a marker this decoder does not handle, carrying the raw
    /// marker byte.
    Unsupported(u8),
}

impl<'a> Amf0Value<'a> {
    /// Get the raw marker byte of the value.
    pub fn marker_byte(&self) -> u8 {
        match self {
            Self::Number(_) => Amf0Marker::Number as u8,
            Self::Boolean(_) => Amf0Marker::Boolean as u8,
            Self::String(_) => Amf0Marker::String as u8,
            Self::Object(_) => Amf0Marker::Object as u8,
            Self::EcmaArray(_) => Amf0Marker::EcmaArray as u8,
            Self::StrictArray(_) => Amf0Marker::StrictArray as u8,
            Self::Unsupported(marker) => *marker,
        }
    }

    /// Detach the value from the buffer it was decoded from.
    pub fn into_owned(self) -> Amf0Value<'static> {
        match self {
            Self::Number(n) => Amf0Value::Number(n),
            Self::Boolean(b) => Amf0Value::Boolean(b),
            Self::String(s) => Amf0Value::String(Cow::Owned(s.into_owned())),
            Self::Object(o) => Amf0Value::Object(properties_into_owned(o)),
            Self::EcmaArray(o) => Amf0Value::EcmaArray(properties_into_owned(o)),
            Self::StrictArray(a) => {
                Amf0Value::StrictArray(a.into_iter().map(Amf0Value::into_owned).collect())
            }
            Self::Unsupported(marker) => Amf0Value::Unsupported(marker),
        }
    }

    /// The number, if this is a [`Amf0Value::Number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is a [`Amf0Value::Boolean`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The string, if this is a [`Amf0Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// The key/value pairs of an object or ECMA array.
    pub fn properties(&self) -> Option<&[(Cow<'a, str>, Amf0Value<'a>)]> {
        match self {
            Self::Object(props) | Self::EcmaArray(props) => Some(props.as_slice()),
            _ => None,
        }
    }

    /// Look up a property of an object or ECMA array by key.
    pub fn get(&self, key: &str) -> Option<&Amf0Value<'a>> {
        self.properties()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

fn properties_into_owned(props: Amf0Properties<'_>) -> Amf0Properties<'static> {
    props
        .into_iter()
        .map(|(k, v)| (Cow::Owned(k.into_owned()), v.into_owned()))
        .collect()
}

/// Insert a property, replacing the value of an existing key in place.
///
/// Repeated keys in an object keep their first position and the last value.
pub fn insert_property<'a>(props: &mut Amf0Properties<'a>, key: Cow<'a, str>, value: Amf0Value<'a>) {
    match props.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => *existing = value,
        None => props.push((key, value)),
    }
}
