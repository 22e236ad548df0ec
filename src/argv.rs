//! Indexable argv built over a fetched buffer.

use crate::error::{Error, Result};
use crate::split::Tokens;
use std::ffi::{c_char, CStr, OsStr, OsString};
use std::marker::PhantomData;
use std::ops::Range;
use std::os::unix::ffi::OsStrExt as _;

/// Owned arguments of a process, one span per argument, in original order.
///
/// Every argument is NUL-terminated inside `buffer`, so each one can also
/// be handed out as a `CStr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgvView {
    buffer: Vec<u8>,
    region: Range<usize>,
    spans: Vec<Range<usize>>,
}

impl ArgvView {
    pub(crate) fn from_buffer(mut buffer: Vec<u8>, region: Range<usize>) -> Result<Self> {
        // Anything past the argument region (the environment, on macOS) is
        // never exposed.
        buffer.truncate(region.end);
        let argc = Tokens::new(&buffer[region.clone()]).count();
        let mut spans = Vec::new();
        spans
            .try_reserve_exact(argc)
            .map_err(|_| Error::OutOfMemory {
                bytes: argc * std::mem::size_of::<Range<usize>>(),
            })?;
        for (offset, token) in Tokens::new(&buffer[region.clone()]) {
            let start = region.start + offset;
            spans.push(start..start + token.len());
        }
        if spans.last().is_some_and(|last| last.end == buffer.len()) {
            buffer
                .try_reserve_exact(1)
                .map_err(|_| Error::OutOfMemory { bytes: 1 })?;
            buffer.push(0);
        }
        log::debug!("materialized {argc} arguments");
        Ok(Self {
            buffer,
            region,
            spans,
        })
    }

    pub fn argc(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.spans.get(index).map(|span| &self.buffer[span.clone()])
    }

    pub fn get_cstr(&self, index: usize) -> Option<&CStr> {
        let span = self.spans.get(index)?;
        CStr::from_bytes_with_nul(&self.buffer[span.start..=span.end]).ok()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.spans.iter().map(|span| &self.buffer[span.clone()])
    }

    pub fn to_os_strings(&self) -> Vec<OsString> {
        self.iter().map(|arg| OsStr::from_bytes(arg).to_owned()).collect()
    }

    /// The delimited bytes the arguments were split from.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.region.clone()]
    }

    /// A conventional `char **argv`, terminated by a null pointer. The
    /// pointers borrow from `self`.
    pub fn as_c_argv(&self) -> Result<CArgv<'_>> {
        let mut ptrs = Vec::new();
        ptrs.try_reserve_exact(self.argc() + 1)
            .map_err(|_| Error::OutOfMemory {
                bytes: (self.argc() + 1) * std::mem::size_of::<*const c_char>(),
            })?;
        for span in &self.spans {
            ptrs.push(self.buffer[span.start..].as_ptr() as *const c_char);
        }
        ptrs.push(std::ptr::null());
        Ok(CArgv {
            ptrs,
            _view: PhantomData,
        })
    }

    pub fn into_raw_parts(self) -> (Vec<u8>, Vec<Range<usize>>) {
        (self.buffer, self.spans)
    }

    /// Release the view. Equivalent to dropping it.
    pub fn release(self) {}
}

impl<'a> IntoIterator for &'a ArgvView {
    type Item = &'a [u8];
    type IntoIter = Box<dyn ExactSizeIterator<Item = &'a [u8]> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Null-terminated pointer array into an [`ArgvView`].
pub struct CArgv<'a> {
    ptrs: Vec<*const c_char>,
    _view: PhantomData<&'a ArgvView>,
}

impl CArgv<'_> {
    pub fn as_ptr(&self) -> *const *const c_char {
        self.ptrs.as_ptr()
    }

    pub fn argc(&self) -> usize {
        self.ptrs.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(data: &[u8]) -> ArgvView {
        ArgvView::from_buffer(data.to_vec(), 0..data.len()).unwrap()
    }

    #[test]
    fn spans_follow_argument_order() {
        let argv = view(b"ls\0-la\0/tmp\0");
        assert_eq!(argv.argc(), 3);
        assert_eq!(argv.get(0), Some(&b"ls"[..]));
        assert_eq!(argv.get(2), Some(&b"/tmp"[..]));
        assert_eq!(argv.get(3), None);
        assert_eq!(argv.get_cstr(1).unwrap().to_bytes(), b"-la");
    }

    #[test]
    fn empty_region_gives_empty_argv() {
        let argv = view(b"");
        assert!(argv.is_empty());
        let c = argv.as_c_argv().unwrap();
        assert_eq!(c.argc(), 0);
        assert!(unsafe { *c.as_ptr() }.is_null());
    }

    #[test]
    fn unterminated_last_argument_gets_a_nul() {
        let argv = view(b"a\0bc");
        assert_eq!(argv.get_cstr(1).unwrap().to_bytes(), b"bc");
        assert_eq!(argv.as_bytes(), b"a\0bc");
    }

    #[test]
    fn round_trips_to_the_region_bytes() {
        let data = b"prog\0\0--flag=x y\0";
        let argv = view(data);
        let mut joined = Vec::new();
        for arg in &argv {
            joined.extend_from_slice(arg);
            joined.push(0);
        }
        assert_eq!(joined, data);
        assert_eq!(argv.as_bytes(), data);
    }

    #[test]
    fn bytes_past_the_region_are_dropped() {
        let data = b"xx\0a\0b\0HOME=/root\0";
        let argv = ArgvView::from_buffer(data.to_vec(), 3..7).unwrap();
        assert_eq!(argv.to_os_strings(), ["a", "b"]);
        let (buffer, spans) = argv.into_raw_parts();
        assert_eq!(buffer.len(), 7);
        assert_eq!(spans, [3..4, 5..6]);
    }

    #[test]
    fn c_argv_is_null_terminated() {
        let argv = view(b"ls\0-la\0");
        let c = argv.as_c_argv().unwrap();
        assert_eq!(c.argc(), 2);
        unsafe {
            let ptrs = std::slice::from_raw_parts(c.as_ptr(), 3);
            assert_eq!(CStr::from_ptr(ptrs[0]).to_bytes(), b"ls");
            assert_eq!(CStr::from_ptr(ptrs[1]).to_bytes(), b"-la");
            assert!(ptrs[2].is_null());
        }
    }
}
