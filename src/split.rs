//! Splitting a raw argument blob into its NUL-terminated tokens.

/// Forward iterator over the tokens of a region. Yields the offset of each
/// token within the region together with its bytes, without the terminator.
///
/// A trailing token with no terminator is yielded as-is. The iterator is
/// `Clone`, so a scan can be restarted from any point.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next token, or the region length once exhausted.
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.data[start..];
        match rest.iter().position(|&b| b == 0) {
            Some(len) => {
                self.pos = start + len + 1;
                Some((start, &rest[..len]))
            }
            None => {
                self.pos = self.data.len();
                Some((start, rest))
            }
        }
    }
}

/// Offset of the first token left after dropping `skip` tokens. Skipping
/// past the last token lands on the end of the region.
pub fn skip_offset(data: &[u8], skip: usize) -> usize {
    let mut tokens = Tokens::new(data);
    for _ in 0..skip {
        if tokens.next().is_none() {
            log::trace!("skip of {skip} exceeds the token count");
            break;
        }
    }
    tokens.offset()
}

pub fn count(data: &[u8]) -> usize {
    Tokens::new(data).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LS: &[u8] = b"ls\0-la\0/tmp\0";

    fn collect(data: &[u8]) -> Vec<&[u8]> {
        Tokens::new(data).map(|(_, t)| t).collect()
    }

    #[test]
    fn splits_on_nul() {
        assert_eq!(collect(LS), [&b"ls"[..], b"-la", b"/tmp"]);
        let offsets: Vec<_> = Tokens::new(LS).map(|(o, _)| o).collect();
        assert_eq!(offsets, [0, 3, 7]);
    }

    #[test]
    fn empty_region_has_no_tokens() {
        assert_eq!(count(b""), 0);
        assert_eq!(skip_offset(b"", 0), 0);
        assert_eq!(skip_offset(b"", 5), 0);
    }

    #[test]
    fn unterminated_tail_is_one_token() {
        assert_eq!(collect(b"abc"), [&b"abc"[..]]);
        assert_eq!(collect(b"a\0bc"), [&b"a"[..], b"bc"]);
    }

    #[test]
    fn empty_arguments_are_kept() {
        assert_eq!(collect(b"prog\0\0x\0"), [&b"prog"[..], b"", b"x"]);
        assert_eq!(count(b"\0"), 1);
    }

    #[test]
    fn skip_drops_leading_tokens() {
        assert_eq!(skip_offset(LS, 0), 0);
        assert_eq!(skip_offset(LS, 1), 3);
        assert_eq!(&LS[skip_offset(LS, 2)..], b"/tmp\0");
        assert_eq!(skip_offset(LS, 3), LS.len());
        assert_eq!(skip_offset(LS, 100), LS.len());
    }

    #[test]
    fn restartable() {
        let mut tokens = Tokens::new(LS);
        tokens.next();
        let saved = tokens.clone();
        assert_eq!(tokens.collect::<Vec<_>>(), saved.collect::<Vec<_>>());
    }
}
