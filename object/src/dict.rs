//! The in-memory DICOM tag dictionary.
use crate::meta::{self, DICM_MAGIC_CODE, PREAMBLE_LENGTH};
use crate::{Result, WriteFileSnafu, EncodeSnafu};
use dicom_dict_core::{tags, uids, Attribute, AttributeMap, Element, Tag, Value, VR};
use dicom_dict_encoding::{write, write_tag_object, ByteStream};
use snafu::ResultExt;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Initial capacity of the output file buffer.
const FILE_BUFFER_CAPACITY: usize = 4096;

/// Initial capacity of the file meta group buffer.
const META_BUFFER_CAPACITY: usize = 1024;

/// An in-memory DICOM data set with its file meta group,
/// which can be serialized into a DICOM Part 10 file.
///
/// The data set starts empty
/// and is populated with [`upsert_tag`](DicomDict::upsert_tag).
/// Lookups see the data set first, then the file meta group.
///
/// # Example
///
/// ```
/// # use dicom_dict_object::{AttributeMap, DicomDict, Tag, VR};
/// let mut dict = DicomDict::new(AttributeMap::new());
/// dict.upsert_tag(Tag(0x0010, 0x0010), VR::PN, ["Doe^John"]);
/// assert_eq!(*dict.get_value(Tag(0x0010, 0x0010)), "Doe^John");
///
/// let bytes = dict.write()?;
/// assert_eq!(&bytes[128..132], b"DICM");
/// # Ok::<(), dicom_dict_object::EncodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DicomDict {
    meta: AttributeMap,
    dict: AttributeMap,
}

impl DicomDict {
    /// Create a dictionary with an empty data set
    /// and the given file meta group.
    pub fn new(meta: AttributeMap) -> Self {
        DicomDict {
            meta,
            dict: AttributeMap::new(),
        }
    }

    /// Insert an attribute into the data set,
    /// or replace the value of an existing one.
    ///
    /// When the data set already has an attribute with this tag,
    /// only its value is replaced:
    /// the VR it was first inserted with is kept and `vr` is ignored.
    pub fn upsert_tag<V>(&mut self, tag: Tag, vr: VR, values: V)
    where
        V: Into<Value>,
    {
        self.upsert_attribute(tag, Attribute::new(vr, values));
    }

    /// Insert an attribute into the data set,
    /// or replace the value of an existing one,
    /// with the same rules as [`upsert_tag`](DicomDict::upsert_tag).
    ///
    /// Unlike `upsert_tag`, the attribute's value may be absent.
    pub fn upsert_attribute(&mut self, tag: Tag, attribute: Attribute) {
        match self.dict.get_mut(&tag) {
            Some(existing) => {
                if existing.vr != attribute.vr {
                    tracing::trace!(
                        "Keeping VR {} of {} over {}",
                        existing.vr,
                        tag,
                        attribute.vr
                    );
                }
                existing.value = attribute.value;
            }
            None => {
                self.dict.insert(tag, attribute);
            }
        }
    }

    /// Remove an attribute from the data set, returning it if it was there.
    ///
    /// The file meta group is not affected.
    pub fn remove_tag(&mut self, tag: Tag) -> Option<Attribute> {
        self.dict.remove(&tag)
    }

    /// Obtain the first value of an attribute.
    ///
    /// The data set is searched first, then the file meta group.
    /// A missing attribute, an absent value and an empty value
    /// all result in an empty string.
    /// A raw byte payload also results in an empty string.
    pub fn get_value(&self, tag: Tag) -> Cow<'_, Element> {
        let empty = || Cow::Owned(Element::Str(String::new()));
        match self.lookup(tag) {
            Some(Value::Str(s)) if !s.is_empty() => Cow::Owned(Element::Str(s.clone())),
            Some(Value::Seq(elements)) => elements.first().map_or_else(empty, Cow::Borrowed),
            _ => empty(),
        }
    }

    /// Obtain all values of an attribute.
    ///
    /// The data set is searched first, then the file meta group.
    /// A missing attribute, an absent value and an empty value
    /// all result in an empty sequence.
    /// A single string results in a sequence of one.
    /// A raw byte payload also results in an empty sequence.
    pub fn get_values(&self, tag: Tag) -> Cow<'_, [Element]> {
        match self.lookup(tag) {
            Some(Value::Str(s)) if !s.is_empty() => Cow::Owned(vec![Element::Str(s.clone())]),
            Some(Value::Seq(elements)) => Cow::Borrowed(elements),
            _ => Cow::Borrowed(&[]),
        }
    }

    fn lookup(&self, tag: Tag) -> Option<&Value> {
        self.dict
            .get(&tag)
            .or_else(|| self.meta.get(&tag))
            .and_then(|attribute| attribute.value.as_ref())
    }

    /// The data set.
    pub fn dict(&self) -> &AttributeMap {
        &self.dict
    }

    /// The file meta group.
    pub fn meta(&self) -> &AttributeMap {
        &self.meta
    }

    /// Mutable access to the file meta group.
    pub fn meta_mut(&mut self) -> &mut AttributeMap {
        &mut self.meta
    }

    /// Serialize the dictionary into the bytes of a DICOM Part 10 file:
    /// the preamble, the magic code, the file meta group and the data set.
    ///
    /// If the file meta group does not declare a transfer syntax,
    /// explicit VR little endian is declared in it first.
    /// This change to the file meta group persists after the call.
    /// The data set is encoded in the declared transfer syntax
    /// and is never modified.
    pub fn write(&mut self) -> dicom_dict_encoding::Result<Vec<u8>> {
        let mut file = ByteStream::with_capacity(FILE_BUFFER_CAPACITY);
        file.write_hex(&"00".repeat(PREAMBLE_LENGTH))?;
        file.write_string(DICM_MAGIC_CODE);

        // the group length goes first, so the group is encoded apart
        let mut meta_stream = ByteStream::with_capacity(META_BUFFER_CAPACITY);
        meta::ensure_transfer_syntax(&mut self.meta);
        write(&self.meta, &mut meta_stream, uids::EXPLICIT_VR_LITTLE_ENDIAN)?;

        let group_length = Value::Seq(vec![Element::Int(meta_stream.size() as i64)]);
        write_tag_object(
            &mut file,
            tags::FILE_META_INFORMATION_GROUP_LENGTH,
            VR::UL,
            &group_length,
            uids::EXPLICIT_VR_LITTLE_ENDIAN,
        )?;
        file.concat(&meta_stream);

        let ts_uid = meta::transfer_syntax_uid(&self.meta);
        tracing::debug!(
            "Writing data set of {} attributes with transfer syntax {}",
            self.dict.len(),
            ts_uid
        );
        write(&self.dict, &mut file, &ts_uid)?;

        Ok(file.into_buffer())
    }

    /// Serialize the dictionary with [`write`](DicomDict::write)
    /// and save the outcome to a file at the given path.
    pub fn write_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.write().context(EncodeSnafu)?;

        let file = File::create(path).context(WriteFileSnafu { filename: path })?;
        let mut to = BufWriter::new(file);
        to.write_all(&bytes)
            .context(WriteFileSnafu { filename: path })?;
        to.flush().context(WriteFileSnafu { filename: path })?;

        tracing::info!("DICOM file saved to {}", path.display());
        Ok(())
    }
}
