use kuchiki::NodeRef;

use crate::error::RenderResult;

/// 序列化文档
pub fn serialize_document(document: &NodeRef) -> RenderResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    document.serialize(&mut buf)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
