//! XML payloads carried in the `payload` form field.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::io;
use std::io::Write;

use lazop_core::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::constants::XML_HEADER;

/// Payload is a request body that can be written as XML.
pub trait Payload {
    /// Write the document element, without the xml declaration.
    fn write_xml<W: Write>(&self, w: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a payload into a document with the xml declaration header.
pub fn to_xml(payload: &impl Payload) -> Result<String> {
    let mut w = Writer::new(Vec::from(XML_HEADER.as_bytes()));
    payload
        .write_xml(&mut w)
        .map_err(|e| Error::request_invalid("unable to encode payload").with_source(e))?;

    String::from_utf8(w.into_inner())
        .map_err(|e| Error::request_invalid("payload is not valid utf-8").with_source(e))
}

fn write_text<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    write_nested(w, name, |w| w.write_event(Event::Text(BytesText::new(text))))
}

fn write_nested<W, F>(w: &mut Writer<W>, name: &str, inner: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut Writer<W>) -> io::Result<()>,
{
    if name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "xml element name must not be empty",
        ));
    }

    w.write_event(Event::Start(BytesStart::new(name)))?;
    inner(w)?;
    w.write_event(Event::End(BytesEnd::new(name)))
}

/// StringMap is a free-form set of attributes, written as one `<key>value</key>`
/// element per entry in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringMap(BTreeMap<String, String>);

impl StringMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    fn write_entries<W: Write>(&self, w: &mut Writer<W>) -> io::Result<()> {
        for (k, v) in &self.0 {
            write_text(w, k, v)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Product to create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Product {
    /// Leaf category the product belongs to.
    pub primary_category: String,
    /// Product level attributes, like `name` or `brand`.
    pub attributes: StringMap,
    /// Variants of the product.
    pub skus: Vec<Sku>,
}

/// Sku is one sellable variant of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sku {
    /// Seller defined sku, always sent.
    pub seller_sku: String,
    /// Image urls, which must already be hosted by the platform.
    pub images: Vec<String>,
    /// Sku level attributes, like `price` or `quantity`.
    pub attributes: StringMap,
}

impl Product {
    fn write_product<W: Write>(&self, w: &mut Writer<W>) -> io::Result<()> {
        write_nested(w, "Product", |w| {
            if !self.attributes.is_empty() {
                write_nested(w, "Attributes", |w| self.attributes.write_entries(w))?;
            }
            if !self.primary_category.is_empty() {
                write_text(w, "PrimaryCategory", &self.primary_category)?;
            }
            if !self.skus.is_empty() {
                write_nested(w, "Skus", |w| {
                    for sku in &self.skus {
                        sku.write_sku(w)?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })
    }
}

impl Sku {
    fn write_sku<W: Write>(&self, w: &mut Writer<W>) -> io::Result<()> {
        write_nested(w, "Sku", |w| {
            if !self.images.is_empty() {
                write_nested(w, "Images", |w| {
                    for image in &self.images {
                        write_text(w, "Image", image)?;
                    }
                    Ok(())
                })?;
            }
            write_text(w, "SellerSku", &self.seller_sku)?;
            self.attributes.write_entries(w)
        })
    }
}

/// Body of `/product/create` and `/product/update`.
#[derive(Debug, Clone, Copy)]
pub struct ProductRequest<'a>(pub &'a Product);

impl Payload for ProductRequest<'_> {
    fn write_xml<W: Write>(&self, w: &mut Writer<W>) -> io::Result<()> {
        write_nested(w, "Request", |w| self.0.write_product(w))
    }
}

/// Body of `/image/migrate`.
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    /// Publicly reachable url of the image.
    pub url: &'a str,
}

impl Payload for ImageRequest<'_> {
    fn write_xml<W: Write>(&self, w: &mut Writer<W>) -> io::Result<()> {
        write_nested(w, "Request", |w| {
            write_nested(w, "Image", |w| write_text(w, "Url", self.url))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazop_core::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_image_request() -> Result<()> {
        let xml = to_xml(&ImageRequest {
            url: "https://example.com/a.jpg?w=1&h=2",
        })?;

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Request><Image><Url>https://example.com/a.jpg?w=1&amp;h=2</Url></Image></Request>"
        );
        Ok(())
    }

    #[test]
    fn test_product_request() -> Result<()> {
        let product = Product {
            primary_category: "10001958".to_string(),
            attributes: [("name", "test product"), ("brand", "Kid Basix")]
                .into_iter()
                .collect(),
            skus: vec![Sku {
                seller_sku: "test-sku".to_string(),
                images: vec!["https://sg-live.slatic.net/original/a.jpg".to_string()],
                attributes: [("quantity", "1"), ("price", "23.0")].into_iter().collect(),
            }],
        };

        assert_eq!(
            to_xml(&ProductRequest(&product))?,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Request><Product>\
             <Attributes><brand>Kid Basix</brand><name>test product</name></Attributes>\
             <PrimaryCategory>10001958</PrimaryCategory>\
             <Skus><Sku>\
             <Images><Image>https://sg-live.slatic.net/original/a.jpg</Image></Images>\
             <SellerSku>test-sku</SellerSku><price>23.0</price><quantity>1</quantity>\
             </Sku></Skus>\
             </Product></Request>"
        );
        Ok(())
    }

    #[test]
    fn test_empty_parts_are_omitted() -> Result<()> {
        let product = Product {
            skus: vec![Sku {
                seller_sku: "only-sku".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert_eq!(
            to_xml(&ProductRequest(&product))?,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Request><Product><Skus><Sku><SellerSku>only-sku</SellerSku></Sku></Skus></Product></Request>"
        );
        Ok(())
    }

    #[test]
    fn test_empty_attribute_name_fails() {
        let product = Product {
            attributes: [("", "nameless")].into_iter().collect(),
            ..Default::default()
        };

        let err = to_xml(&ProductRequest(&product)).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }
}
