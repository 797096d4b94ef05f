use crate::error::Result;
use hickory_proto::op::Message;

/// What a resolver may hand back: a decoded message or its raw wire form.
pub trait IntoMessage {
    fn into_message(self) -> Result<Message>;
}

impl IntoMessage for Message {
    fn into_message(self) -> Result<Message> {
        Ok(self)
    }
}

impl IntoMessage for Vec<u8> {
    fn into_message(self) -> Result<Message> {
        Ok(Message::from_vec(&self)?)
    }
}

impl IntoMessage for &[u8] {
    fn into_message(self) -> Result<Message> {
        Ok(Message::from_vec(self)?)
    }
}
