/// Letter token for an index, spreadsheet-column style.
///
/// `0 -> a`, `25 -> z`, `26 -> aa`, `27 -> ab`, `701 -> zz`, `702 -> aaa`.
pub fn alpha_index(index: u32, capital: bool) -> String {
    let base = if capital { b'A' } else { b'a' };
    let mut rev = Vec::new();
    let mut n = u64::from(index) + 1;
    while n > 0 {
        n -= 1;
        rev.push((base + (n % 26) as u8) as char);
        n /= 26;
    }
    rev.iter().rev().collect()
}
