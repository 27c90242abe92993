//! End-to-end scenarios driving the allocator the way an interpreter does.

use vmseg_core::{CoreError, SegmentId, TypeCode, ValueWidth, VmData};

#[test]
fn create_append_duplicate_destroy_lifecycle() {
    let mut vm = VmData::new();
    let store = vm.store_mut();

    let first = store.create();
    assert_eq!(store.get(first).unwrap().used(), 0);

    // Typed appends return the pre-increment offset.
    let buf = store.get_mut(first).unwrap();
    assert_eq!(buf.append_dword(0x1122_3344).unwrap(), 0);
    assert_eq!(buf.used(), 4);
    assert_eq!(buf.append_byte(0xFF).unwrap(), 4);
    assert_eq!(buf.used(), 5);

    // Duplicate is byte-identical at the instant of the copy.
    let second = store.duplicate(first).unwrap();
    assert_ne!(first, second);
    let expected = store.get(first).unwrap().as_slice().to_vec();
    assert_eq!(store.get(second).unwrap().used(), 5);
    assert_eq!(store.get(second).unwrap().as_slice(), &expected[..]);

    // Destroying the original leaves the duplicate fully readable.
    store.destroy(first).unwrap();
    assert!(matches!(
        store.get(first),
        Err(CoreError::SegmentNotFound { .. })
    ));
    let survivor = store.get(second).unwrap();
    assert_eq!(survivor.used(), 5);
    assert_eq!(survivor.read_value(0, ValueWidth::Dword).unwrap(), 0x1122_3344);
    assert_eq!(survivor.read_value(4, ValueWidth::Byte).unwrap(), 0xFF);
}

#[test]
fn compiled_offsets_survive_growth() {
    let mut vm = VmData::new();
    let globals = vm.globaldata();
    let buf = vm.store_mut().get_mut(globals).unwrap();

    // Record every offset the "compiler" would embed in bytecode.
    let mut addresses = Vec::new();
    for i in 0..1_000u64 {
        addresses.push((buf.append_qword(i).unwrap(), i));
    }

    // The buffer reallocated many times; every address still resolves.
    for (offset, value) in addresses {
        assert_eq!(buf.read_value(offset, ValueWidth::Qword).unwrap(), value);
    }
}

#[test]
fn frame_locals_reset_between_calls() {
    let mut vm = VmData::new();
    let locals = vm.localdata();

    // First call frame writes some locals.
    let frame_base = vm.store_mut().get_mut(locals).unwrap().append_dword(11).unwrap();
    vm.store_mut().get_mut(locals).unwrap().append_dword(22).unwrap();
    assert_eq!(frame_base, 0);

    // Frame exits; the next frame starts from a clean offset space.
    vm.reset_locals().unwrap();
    let next_base = vm.store_mut().get_mut(locals).unwrap().append_dword(33).unwrap();
    assert_eq!(next_base, 0);
    assert_eq!(vm.store().get(locals).unwrap().used(), 4);
}

#[test]
fn user_type_storage_via_named_segments() {
    let mut vm = VmData::new();
    let point_type = TypeCode::new(2001);

    // Declaring an instance of a user type appends into its segment.
    let seg = vm.segment_by_name(point_type);
    let x_at = vm.store_mut().get_mut(seg).unwrap().append_dword(10).unwrap();
    let y_at = vm.store_mut().get_mut(seg).unwrap().append_dword(20).unwrap();
    assert_eq!((x_at, y_at), (0, 4));

    // Later lookups hit the same backing segment.
    let again = vm.segment_by_name(point_type);
    assert_eq!(again, seg);
    assert_eq!(vm.store().get(again).unwrap().used(), 8);
}

#[test]
fn append_from_builds_composite_segments() {
    let mut vm = VmData::new();
    let store = vm.store_mut();

    let header = store.create();
    store.get_mut(header).unwrap().append_bytes(&[0xEB, 0x00]).unwrap();
    let body = store.create();
    store.get_mut(body).unwrap().append_bytes(&[1, 2, 3, 4]).unwrap();

    let image = store.create();
    let header_at = store.append_from(image, header).unwrap();
    let body_at = store.append_from(image, body).unwrap();

    assert_eq!(header_at, 0);
    assert_eq!(body_at, 2);
    assert_eq!(store.get(image).unwrap().as_slice(), &[0xEB, 0x00, 1, 2, 3, 4]);
}

#[test]
fn stale_handles_never_alias_new_segments() {
    let mut vm = VmData::new();
    let store = vm.store_mut();

    let mut stale: Vec<SegmentId> = Vec::new();
    for _ in 0..10 {
        let id = store.create();
        store.destroy(id).unwrap();
        stale.push(id);
    }

    // New segments keep drawing fresh ids; none of the stale handles ever
    // resolves again.
    let fresh = store.create();
    for id in stale {
        assert_ne!(id, fresh);
        assert!(store.get(id).is_err());
    }
}
