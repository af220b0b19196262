use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::hash::Hash;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::Bind;
use crate::class::{ArrayInfo, Class, GenericClassCell, ListInfo, MapInfo, Type, Typed};

// -----------------------------------------------------------------------------
// Lists

macro_rules! impl_list {
    ($ty:ident < T $(: $bound:path)* > , $name:literal, $push:ident) => {
        impl<T: Typed $(+ $bound)*> Typed for $ty<T> {
            fn class() -> &'static Class {
                static CELL: GenericClassCell = GenericClassCell::new();
                CELL.get_or_insert::<Self>(|| {
                    Class::List(ListInfo::new(
                        Type::named::<Self>($name),
                        T::class,
                        || Box::new($ty::<T>::new()),
                        |list, item| {
                            let Some(list) = list.downcast_mut::<$ty<T>>() else {
                                return Err(item);
                            };
                            list.$push(item.take::<T>()?);
                            Ok(())
                        },
                        |list| match list.downcast_ref::<$ty<T>>() {
                            Some(list) => list.iter().map(|item| item as &dyn Bind).collect(),
                            None => Vec::new(),
                        },
                    ))
                })
            }
        }
    };
}

impl_list!(Vec<T>, "Vec", push);
impl_list!(VecDeque<T>, "VecDeque", push_back);
impl_list!(BTreeSet<T: Ord>, "BTreeSet", insert);
impl_list!(HashSet<T: Eq: Hash>, "HashSet", insert);

// -----------------------------------------------------------------------------
// Arrays

impl<T: Typed> Typed for Box<[T]> {
    fn class() -> &'static Class {
        static CELL: GenericClassCell = GenericClassCell::new();
        CELL.get_or_insert::<Self>(|| {
            Class::Array(ArrayInfo::new(
                Type::named::<Self>("Array"),
                T::class,
                None,
                |array| match array.downcast_ref::<Box<[T]>>() {
                    Some(array) => array.iter().map(|item| item as &dyn Bind).collect(),
                    None => Vec::new(),
                },
                |items| {
                    let items: Option<Vec<T>> =
                        items.into_iter().map(|item| item.take::<T>().ok()).collect();
                    Some(Box::new(items?.into_boxed_slice()))
                },
            ))
        })
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn class() -> &'static Class {
        static CELL: GenericClassCell = GenericClassCell::new();
        CELL.get_or_insert::<Self>(|| {
            Class::Array(ArrayInfo::new(
                Type::named::<Self>("Array"),
                T::class,
                Some(N),
                |array| match array.downcast_ref::<[T; N]>() {
                    Some(array) => array.iter().map(|item| item as &dyn Bind).collect(),
                    None => Vec::new(),
                },
                |items| {
                    let items: Option<Vec<T>> =
                        items.into_iter().map(|item| item.take::<T>().ok()).collect();
                    let array = <[T; N]>::try_from(items?).ok()?;
                    Some(Box::new(array))
                },
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// Maps

macro_rules! impl_map {
    ($ty:ident < K $(: $bound:path)* > , $name:literal) => {
        impl<K: Typed $(+ $bound)*, V: Typed> Typed for $ty<K, V> {
            fn class() -> &'static Class {
                static CELL: GenericClassCell = GenericClassCell::new();
                CELL.get_or_insert::<Self>(|| {
                    Class::Map(MapInfo::new(
                        Type::named::<Self>($name),
                        K::class,
                        V::class,
                        || Box::new($ty::<K, V>::default()),
                        |map, key, value| {
                            let Some(map) = map.downcast_mut::<$ty<K, V>>() else {
                                return Err((key, value));
                            };
                            let key = match key.take::<K>() {
                                Ok(key) => key,
                                Err(key) => return Err((key, value)),
                            };
                            match value.take::<V>() {
                                Ok(value) => {
                                    map.insert(key, value);
                                    Ok(())
                                }
                                Err(value) => Err((Box::new(key), value)),
                            }
                        },
                        |map| match map.downcast_ref::<$ty<K, V>>() {
                            Some(map) => map
                                .iter()
                                .map(|(key, value)| (key as &dyn Bind, value as &dyn Bind))
                                .collect(),
                            None => Vec::new(),
                        },
                    ))
                })
            }
        }
    };
}

impl_map!(BTreeMap<K: Ord>, "BTreeMap");
impl_map!(HashMap<K: Eq: Hash>, "HashMap");
impl_map!(IndexMap<K: Eq: Hash>, "IndexMap");

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use crate::Bind;
    use crate::class::Typed;

    #[test]
    fn fixed_array_checks_length() {
        let info = <[u8; 2] as Typed>::class().as_array().unwrap();
        assert_eq!(info.fixed(), Some(2));

        let items: Vec<Box<dyn Bind>> = vec![Box::new(1_u8), Box::new(2_u8)];
        let array = info.collect(items).unwrap();
        assert_eq!(array.take::<[u8; 2]>().unwrap(), [1, 2]);

        let items: Vec<Box<dyn Bind>> = vec![Box::new(1_u8)];
        assert!(info.collect(items).is_none());
    }

    #[test]
    fn map_insert_rejects_wrong_types() {
        let info = <BTreeMap<String, u32> as Typed>::class().as_map().unwrap();
        let mut map = info.create();
        info.insert(&mut *map, Box::new(String::from("a")), Box::new(1_u32))
            .unwrap();
        assert!(info.insert(&mut *map, Box::new(1_u32), Box::new(1_u32)).is_err());
        assert_eq!(info.len(&*map), 1);
        assert!(info.key().ty().is::<String>());
    }
}
