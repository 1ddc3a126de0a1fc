#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_dehydrate as dehydrate;
pub use vc_introspect as introspect;
