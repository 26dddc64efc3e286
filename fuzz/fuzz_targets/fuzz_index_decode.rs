#![no_main]

use libfuzzer_sys::fuzz_target;
use tarsau::archive::{bound_header, decode_names, parse_count, ArchiveIndex};

fuzz_target!(|data: &[u8]| {
    let header = bound_header(data);
    let _ = parse_count(header);
    let _ = decode_names(header);

    // Anything the strict decoder accepts must re-encode to a header it accepts again
    if let Ok(index) = ArchiveIndex::decode(header) {
        let encoded = index.encode();
        let again = ArchiveIndex::decode(bound_header(&encoded));
        if encoded.len() <= tarsau::HEADER_CAPACITY {
            assert_eq!(again.ok(), Some(index));
        }
    }
});
