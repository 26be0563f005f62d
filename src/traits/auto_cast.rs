// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Traits for reading and writing Rust primitive types out of byte memory.
//!
//! Users of this module should impl [Grab] for their type, which notably returns `&[u8]` and `&mut [u8]`

use crate::error::{Error, Result};
use std::slice::SliceIndex;

/// Gets a `&[u8]` at [SliceIndex] `I`.
///
/// This is similar to the [SliceIndex] method `.get(...)`, however implementing this trait
/// will auto-impl [AutoCast]<([u8], [u16])>
pub trait Grab {
    /// Gets the slice of Self at [SliceIndex] I
    fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>;

    /// Gets a mutable slice of Self at [SliceIndex] I
    fn grab_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>;
}

/// Read or Write a T at address `addr`
///
/// Out-of-range accesses never touch memory; they return [Error::InvalidAddressRange].
pub trait AutoCast<T>: Grab {
    /// Reads a T from address `addr`
    fn read(&self, addr: impl Into<usize>) -> Result<T>;
    /// Writes a T to address `addr`
    fn write(&mut self, addr: impl Into<usize>, data: T) -> Result<()>;
}

/// Implements [AutoCast] for the provided types
///
/// Relies on inherent methods of Rust numeric types:
/// - `Self::from_be_bytes`
/// - `Self::to_be_bytes`
macro_rules! impl_rw {($($t:ty) ,* $(,)?) =>{
    $(
        #[doc = concat!("Read or Write [", stringify!($t), "] at address `addr`")]
        impl<T: Grab> AutoCast<$t> for T {
            #[inline(always)]
            fn read(&self, addr: impl Into<usize>) -> Result<$t> {
                let addr: usize = addr.into();
                let range = addr..addr + core::mem::size_of::<$t>();
                match self.grab(range.clone()) {
                    // Chip-8 is a big-endian system
                    Some(bytes) => Ok(<$t>::from_be_bytes(bytes.try_into()?)),
                    None => Err(Error::InvalidAddressRange { range }),
                }
            }
            #[inline(always)]
            fn write(&mut self, addr: impl Into<usize>, data: $t) -> Result<()> {
                let addr: usize = addr.into();
                let range = addr..addr + core::mem::size_of::<$t>();
                match self.grab_mut(range.clone()) {
                    Some(slice) => {
                        slice.copy_from_slice(&data.to_be_bytes());
                        Ok(())
                    }
                    None => Err(Error::InvalidAddressRange { range }),
                }
            }
        }
    )*
}}

impl_rw!(u8, u16);
