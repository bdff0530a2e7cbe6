use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Acknowledgement body returned by destructive operations.
#[derive(Serialize, Debug)]
pub struct Ack<T> {
    pub message: &'static str,
    pub id: T,
}
