use std::{collections::HashSet, error::Error, io::Write, sync::Arc};

use netcdf4_hierarchy::{
    data_type::Type,
    group::{Group, GroupLocation, Location},
    hierarchy_error::{HierarchyError, ValidationError},
    storage::{
        status::NC_EBADID,
        storage_adapter::{
            performance_metrics::PerformanceMetricsStorageAdapter,
            usage_log::UsageLogStorageAdapter,
        },
        store::MemoryStore,
        ReadableWritableStorage, ReadableWritableStorageTraits,
    },
};
use parking_lot::Mutex;

struct Usa<TStorage: ?Sized> {
    root: Group<TStorage>,
    usa: Group<TStorage>,
    colorado: Group<TStorage>,
    wyoming: Group<TStorage>,
    alaska: Group<TStorage>,
}

/// root -> USA (time = 2) -> { Colorado (stations = 5), Wyoming (stations = 4), Alaska (stations = 3, time = 5) }
fn usa_hierarchy<TStorage: ?Sized + ReadableWritableStorageTraits>(
    storage: Arc<TStorage>,
) -> Result<Usa<TStorage>, HierarchyError> {
    let root = Group::open_root(storage)?;
    let usa = root.add_group("USA")?;
    usa.add_dimension("time", 2)?;
    let colorado = usa.add_group("Colorado")?;
    colorado.add_dimension("stations", 5)?;
    let wyoming = usa.add_group("Wyoming")?;
    wyoming.add_dimension("stations", 4)?;
    let alaska = usa.add_group("Alaska")?;
    alaska.add_dimension("stations", 3)?;
    alaska.add_dimension("time", 5)?;
    Ok(Usa {
        root,
        usa,
        colorado,
        wyoming,
        alaska,
    })
}

fn sizes<TStorage: ?Sized + ReadableWritableStorageTraits>(
    group: &Group<TStorage>,
    name: &str,
    location: Location,
) -> Result<HashSet<u64>, HierarchyError> {
    group
        .dimensions(name, location)?
        .iter()
        .map(|dim| dim.size())
        .collect()
}

#[test]
fn hierarchy_dimension_lookup() -> Result<(), Box<dyn Error>> {
    let h = usa_hierarchy(Arc::new(MemoryStore::new()))?;

    let defined = [
        (&h.usa, "time", 2),
        (&h.colorado, "stations", 5),
        (&h.wyoming, "stations", 4),
        (&h.alaska, "stations", 3),
        (&h.alaska, "time", 5),
    ];
    for (group, name, size) in defined {
        for location in [
            Location::Current,
            Location::ParentsAndCurrent,
            Location::ChildrenAndCurrent,
            Location::All,
        ] {
            assert!(sizes(group, name, location)?.contains(&size));
            let dimensions = group.dimensions_multimap(location)?;
            assert!(dimensions
                .equal_range(name)
                .into_iter()
                .any(|dim| dim.size().ok() == Some(size)));
        }
        let dim = group.dimension(name, Location::Current)?;
        assert_eq!(dim.size()?, size);
        assert_eq!(dim.name()?, name);
        assert_eq!(&dim.parent_group()?, group);
    }

    assert_eq!(
        sizes(&h.usa, "stations", Location::Children)?,
        HashSet::from([5, 4, 3])
    );
    assert_eq!(
        sizes(&h.colorado, "time", Location::Parents)?,
        HashSet::from([2])
    );
    assert!(sizes(&h.usa, "stations", Location::Current)?.is_empty());
    assert!(h.usa.dimension("stations", Location::Parents)?.is_null());
    assert_eq!(h.usa.dimension_count(Location::All)?, 5);
    assert_eq!(h.alaska.dimension_count(Location::ParentsAndCurrent)?, 3);
    assert_eq!(h.root.dimension_count(Location::Children)?, 5);
    Ok(())
}

#[test]
fn hierarchy_shadowing() -> Result<(), Box<dyn Error>> {
    let h = usa_hierarchy(Arc::new(MemoryStore::new()))?;
    let denver = h.colorado.add_group("Denver")?;
    denver.add_dimension("stations", 4)?;

    let stations = denver.dimension("stations", Location::ParentsAndCurrent)?;
    assert!([4, 5].contains(&stations.size()?));
    assert_eq!(
        sizes(&denver, "stations", Location::ParentsAndCurrent)?,
        HashSet::from([4, 5])
    );

    let time = h.alaska.dimension("time", Location::ParentsAndCurrent)?;
    assert!([2, 5].contains(&time.size()?));
    assert_eq!(
        sizes(&h.alaska, "time", Location::ParentsAndCurrent)?,
        HashSet::from([2, 5])
    );
    Ok(())
}

#[test]
fn hierarchy_add_variable_dimension_validation() -> Result<(), Box<dyn Error>> {
    let h = usa_hierarchy(Arc::new(MemoryStore::new()))?;
    let time = h.usa.dimension("time", Location::Current)?;
    let stations = h.wyoming.dimension("stations", Location::Current)?;

    // the time handle belongs to USA, not Wyoming
    let err = h
        .wyoming
        .add_variable("average_temperature", Type::FLOAT, vec![time, stations.clone()])
        .unwrap_err();
    assert!(matches!(
        err,
        HierarchyError::ValidationError(ValidationError::DimensionNotInGroup(_))
    ));
    assert!(h
        .wyoming
        .variable("average_temperature", Location::Current)?
        .is_null());

    // by name, time is found in USA
    let var = h
        .wyoming
        .add_variable("average_temperature", "float", ["time", "stations"])?;
    assert_eq!(var.data_length()?, 8);
    assert_eq!(var.dimension(1)?, stations);
    assert_eq!(var.dimension(0)?.parent_group()?, h.usa);
    Ok(())
}

#[test]
fn hierarchy_variable_lookup() -> Result<(), Box<dyn Error>> {
    let h = usa_hierarchy(Arc::new(MemoryStore::new()))?;
    h.usa.add_variable("time", Type::DOUBLE, "time")?;
    for state in [&h.colorado, &h.wyoming, &h.alaska] {
        state.add_variable("average_temperature", Type::FLOAT, ["time", "stations"])?;
    }

    assert_eq!(h.usa.variable_count(Location::Current)?, 1);
    assert_eq!(h.usa.variable_count(Location::Children)?, 3);
    assert_eq!(h.usa.variable_count(Location::All)?, 4);
    assert_eq!(h.alaska.variable_count(Location::Parents)?, 1);
    assert_eq!(
        h.usa
            .variables("average_temperature", Location::Children)?
            .len(),
        3
    );
    assert_eq!(
        h.alaska
            .variable("time", Location::ParentsAndCurrent)?
            .parent_group()?,
        h.usa
    );
    assert!(h.alaska.variable("time", Location::Current)?.is_null());

    let lengths = h
        .usa
        .variables("average_temperature", Location::ChildrenAndCurrent)?
        .iter()
        .map(|var| var.data_length())
        .collect::<Result<HashSet<_>, _>>()?;
    // Alaska's own time dimension (5) shadows USA's (2)
    assert_eq!(lengths, HashSet::from([10, 8, 15]));
    Ok(())
}

#[test]
fn hierarchy_group_lookup() -> Result<(), Box<dyn Error>> {
    let h = usa_hierarchy(Arc::new(MemoryStore::new()))?;

    assert_eq!(h.usa.group_count(GroupLocation::All)?, 5);
    assert_eq!(h.usa.group_count(GroupLocation::Children)?, 3);
    assert_eq!(h.usa.group_count(GroupLocation::ChildrenOfChildren)?, 0);
    assert_eq!(h.usa.group_count(GroupLocation::Parents)?, 1);
    assert_eq!(h.usa.group_count(GroupLocation::ParentsAndCurrent)?, 2);
    assert_eq!(h.root.group_count(GroupLocation::ChildrenOfChildren)?, 3);
    assert_eq!(h.root.group_count(GroupLocation::AllChildren)?, 4);
    assert_eq!(h.wyoming.group_count(GroupLocation::All)?, 3);
    assert_eq!(
        h.usa.groups_multimap(GroupLocation::All)?.length(),
        h.usa.group_count(GroupLocation::All)?
    );

    assert_eq!(h.usa.group("Alaska", GroupLocation::Children)?, h.alaska);
    assert_eq!(h.root.group("Wyoming", GroupLocation::AllChildren)?, h.wyoming);
    assert!(h.root.group("Wyoming", GroupLocation::Children)?.is_null());
    assert_eq!(h.alaska.group("/", GroupLocation::Parents)?, h.root);
    assert_eq!(
        h.colorado
            .groups("Colorado", GroupLocation::ParentsAndCurrent)?
            .len(),
        1
    );
    assert_eq!(h.alaska.full_name()?, "/USA/Alaska");
    Ok(())
}

#[test]
fn hierarchy_parent_chain() -> Result<(), Box<dyn Error>> {
    let h = usa_hierarchy(Arc::new(MemoryStore::new()))?;
    for group in [&h.colorado, &h.wyoming, &h.alaska, &h.usa, &h.root] {
        let mut current = group.clone();
        while !current.is_root()? {
            current = current.parent_group()?;
        }
        assert_eq!(current.name()?, "/");
        assert!(current.parent_group()?.is_null());
    }
    Ok(())
}

#[test]
fn hierarchy_null_handles_make_no_storage_calls() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(PerformanceMetricsStorageAdapter::new(Arc::new(
        MemoryStore::new(),
    )));
    let h = usa_hierarchy(Arc::clone(&store))?;
    let mut null_group = h.usa.clone();
    null_group.set_null();
    let mut null_dimension = h.usa.dimension("time", Location::Current)?;
    null_dimension.set_null();
    store.reset();

    assert!(matches!(
        null_group.dimension("time", Location::All),
        Err(HierarchyError::NullHandle(_))
    ));
    assert!(null_group.group_count(GroupLocation::All).is_err());
    assert!(null_group.add_dimension("x", 1).is_err());
    assert!(null_group.add_scalar_variable("x", Type::INT).is_err());
    assert!(null_group.parent_group().is_err());
    assert!(null_dimension.size().is_err());
    assert!(null_dimension.is_valid_in(&h.usa).is_err());
    let time = h.usa.dimension("time", Location::Current)?;
    store.reset();
    assert!(time.is_valid_in(&null_group).is_err());
    assert_eq!(store.calls(), 0);

    let err = h
        .wyoming
        .add_variable("x", Type::INT, null_dimension)
        .unwrap_err();
    assert_eq!(err, HierarchyError::from(ValidationError::NullDimension));
    assert_eq!(store.reads(), 0);
    Ok(())
}

#[test]
fn hierarchy_closed_store() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let h = usa_hierarchy(Arc::clone(&store))?;
    let time = h.usa.dimension("time", Location::Current)?;
    store.close();

    let Err(HierarchyError::StorageError(err)) = h.usa.dimension("time", Location::All) else {
        panic!("expected a storage error")
    };
    assert_eq!(err.code(), Some(NC_EBADID));
    assert!(matches!(
        time.size(),
        Err(HierarchyError::StorageError(_))
    ));
    assert!(h.root.add_group("Canada").is_err());
    Ok(())
}

#[test]
fn hierarchy_dyn_storage() -> Result<(), Box<dyn Error>> {
    let storage: ReadableWritableStorage = Arc::new(MemoryStore::new());
    let h = usa_hierarchy(storage)?;
    assert_eq!(h.usa.group_count(GroupLocation::All)?, 5);
    assert_eq!(
        h.root.hierarchy_tree()?,
        "/
  USA
    time = 2
    Colorado
      stations = 5
    Wyoming
      stations = 4
    Alaska
      stations = 3
      time = 5
"
    );
    Ok(())
}

#[test]
fn hierarchy_usage_log() -> Result<(), Box<dyn Error>> {
    let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
    let log_writer: Arc<Mutex<dyn Write + Send + Sync>> = buffer.clone();
    let store = Arc::new(UsageLogStorageAdapter::new(
        Arc::new(MemoryStore::new()),
        log_writer,
        || chrono::Utc::now().format("[%T%.3f] ").to_string(),
    ));
    let h = usa_hierarchy(store)?;
    buffer.lock().clear();

    h.wyoming.dimension("time", Location::ParentsAndCurrent)?;
    let log = String::from_utf8(buffer.lock().clone())?;
    let calls = log
        .lines()
        .map(|line| line.split_once("] ").map_or(line, |(_, call)| call))
        .collect::<Vec<_>>();
    assert_eq!(
        calls,
        vec![
            "parent_group(3) -> Ok(Some(GroupId(1)))",
            "parent_group(1) -> Ok(Some(GroupId(0)))",
            "parent_group(0) -> Ok(None)",
            "dimension_ids(3, include_parents=false) -> [2]",
            "dimension_name(3, 2) -> Ok(\"stations\")",
            "dimension_ids(1, include_parents=false) -> [0]",
            "dimension_name(1, 0) -> Ok(\"time\")",
            "dimension_ids(0, include_parents=false) -> []",
        ]
    );
    Ok(())
}
