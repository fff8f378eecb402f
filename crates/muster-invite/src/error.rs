//! Error type for `muster-invite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("qr encoding error: {0}")]
  Qr(#[from] qrcode::types::QrError),

  #[error("png encoding error: {0}")]
  Png(#[from] image::ImageError),

  #[error("invalid email address: {0}")]
  Address(#[from] lettre::address::AddressError),

  #[error("message build error: {0}")]
  Message(#[from] lettre::error::Error),

  #[error("content type error: {0}")]
  ContentType(#[from] lettre::message::header::ContentTypeErr),

  #[error("smtp delivery error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
