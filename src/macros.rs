//! Record declaration macro.
//!
//! [`define_record!`] is exported so downstream crates can declare additional record types
//! with the same encoding rules as the built-in ones.

/// Declare a record type.
///
/// Generates the owned struct, its zero-copy view, and the [`crate::Record`] and
/// [`crate::RecordView`] implementations from a list of `slot => field: kind` entries. Slots
/// are the wire identity of a field: new fields get new, higher slots, and published slots are
/// never reused. Field attributes are limited to doc comments.
///
/// The optional `kind: Variant;` line ties the record to a [`crate::RecordKind`] and is only
/// used by the built-in records. Records declared elsewhere leave it out and report
/// `KIND == None`; log output names them by their struct name.
///
/// The owned struct always derives `Clone`, `Debug`, `Default` and `PartialEq`; further derives
/// can be passed as attributes.
///
/// # Examples
///
/// ```rust
/// use shieldbuf::{define_record, Record};
///
/// define_record! {
///     /// A labelled amount.
///     pub struct Tagged => TaggedView {
///         0 => label: string,
///         1 => amount: u64,
///         2 => tags: opt_string,
///     }
/// }
///
/// assert_eq!(Tagged::KIND, None);
/// assert_eq!(Tagged::NAME, "Tagged");
///
/// let tagged = Tagged { label: "fee".to_string(), amount: 1000, tags: None };
/// let data = tagged.to_bytes()?;
/// let view = Tagged::view_bytes(&data)?;
/// assert_eq!(view.amount()?, 1000);
/// assert_eq!(view.tags()?, None);
/// assert_eq!(Tagged::from_bytes(&data)?, tagged);
/// # Ok::<(), shieldbuf::Error>(())
/// ```
#[macro_export]
macro_rules! define_record {
    (@owned string) => { ::std::string::String };
    (@owned opt_string) => { ::std::option::Option<::std::string::String> };
    (@owned bytes) => { ::std::vec::Vec<u8> };
    (@owned [$record:ty]) => { ::std::vec::Vec<$record> };
    (@owned $scalar:ident) => { $scalar };

    (@borrowed $lt:lifetime, string) => { &$lt str };
    (@borrowed $lt:lifetime, opt_string) => { ::std::option::Option<&$lt str> };
    (@borrowed $lt:lifetime, bytes) => { &$lt [u8] };
    (@borrowed $lt:lifetime, [$record:ty]) => {
        $crate::VectorView<$lt, <$record as $crate::Record>::View<$lt>>
    };
    (@borrowed $lt:lifetime, $scalar:ident) => { $scalar };

    (@get $table:expr, $slot:literal, string) => {
        Ok($table.get_str($slot)?.unwrap_or(""))
    };
    (@get $table:expr, $slot:literal, opt_string) => {
        $table.get_str($slot)
    };
    (@get $table:expr, $slot:literal, bytes) => {
        Ok($table.get_bytes($slot)?.unwrap_or(&[]))
    };
    (@get $table:expr, $slot:literal, [$record:ty]) => {
        $table.get_vector_or_empty($slot)
    };
    (@get $table:expr, $slot:literal, $scalar:ident) => {
        $table.get_field::<$scalar>($slot, <$scalar as ::std::default::Default>::default())
    };

    (@child $builder:ident, $value:expr, string) => {
        if $value.is_empty() && !$builder.force_defaults() {
            None
        } else {
            Some($builder.write_string($value)?)
        }
    };
    (@child $builder:ident, $value:expr, opt_string) => {
        match $value {
            Some(text) => Some($builder.write_string(text)?),
            None => None,
        }
    };
    (@child $builder:ident, $value:expr, bytes) => {
        if $value.is_empty() && !$builder.force_defaults() {
            None
        } else {
            Some($builder.write_bytes($value)?)
        }
    };
    (@child $builder:ident, $value:expr, [$record:ty]) => {{
        let items: &[$record] = $value;
        if items.is_empty() && !$builder.force_defaults() {
            None
        } else {
            let mut offsets = ::std::vec::Vec::with_capacity(items.len());
            for item in items {
                offsets.push($crate::Record::encode(item, $builder)?);
            }
            Some($builder.write_table_vector(&offsets)?)
        }
    }};
    (@child $builder:ident, $value:expr, $scalar:ident) => {
        *$value
    };

    (@add $builder:ident, $slot:literal, $local:ident, string) => {
        $crate::define_record!(@add_offset $builder, $slot, $local)
    };
    (@add $builder:ident, $slot:literal, $local:ident, opt_string) => {
        $crate::define_record!(@add_offset $builder, $slot, $local)
    };
    (@add $builder:ident, $slot:literal, $local:ident, bytes) => {
        $crate::define_record!(@add_offset $builder, $slot, $local)
    };
    (@add $builder:ident, $slot:literal, $local:ident, [$record:ty]) => {
        $crate::define_record!(@add_offset $builder, $slot, $local)
    };
    (@add $builder:ident, $slot:literal, $local:ident, $scalar:ident) => {
        $builder.add_field_default::<$scalar>(
            $slot,
            $local,
            <$scalar as ::std::default::Default>::default(),
        )?
    };
    (@add_offset $builder:ident, $slot:literal, $local:ident) => {
        if let Some(offset) = $local {
            $builder.add_offset($slot, offset)?;
        }
    };

    (@unpack $value:expr, string) => { $value.to_string() };
    (@unpack $value:expr, opt_string) => { $value.map(str::to_string) };
    (@unpack $value:expr, bytes) => { $value.to_vec() };
    (@unpack $value:expr, [$record:ty]) => {
        $value.par_map(|item| $crate::RecordView::unpack(&item))?
    };
    (@unpack $value:expr, $scalar:ident) => { $value };

    (@kind) => { ::std::option::Option::None };
    (@kind $kind:ident) => {
        ::std::option::Option::Some($crate::records::RecordKind::$kind)
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $view:ident {
            $(kind: $kind:ident;)?
            $(
                $(#[doc = $doc:literal])*
                $slot:literal => $field:ident : $ty:tt
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                #[doc = ""]
                #[doc = concat!("Slot ", stringify!($slot), ".")]
                pub $field: $crate::define_record!(@owned $ty),
            )*
        }

        #[doc = concat!("Zero-copy view of a [`", stringify!($name), "`] table.")]
        #[derive(Clone, Copy, Debug)]
        $vis struct $view<'a>($crate::TableView<'a>);

        impl<'a> $view<'a> {
            $(
                $(#[doc = $doc])*
                #[doc = ""]
                #[doc = concat!("Reads slot ", stringify!($slot), ".")]
                ///
                /// # Errors
                /// Returns a decode error if the field is present but invalid.
                pub fn $field(&self) -> $crate::Result<$crate::define_record!(@borrowed 'a, $ty)> {
                    $crate::define_record!(@get self.0, $slot, $ty)
                }
            )*
        }

        impl $crate::Record for $name {
            type View<'a> = $view<'a>;

            const KIND: ::std::option::Option<$crate::records::RecordKind> =
                $crate::define_record!(@kind $($kind)?);

            const NAME: &'static str = stringify!($name);

            const FIELDS: &'static [(u16, &'static str)] = &[$(($slot, stringify!($field))),*];

            fn encode(
                &self,
                builder: &mut $crate::Builder,
            ) -> $crate::Result<$crate::Offset<Self>> {
                $(
                    let $field = $crate::define_record!(@child builder, &self.$field, $ty);
                )*

                builder.start_table()?;
                $(
                    $crate::define_record!(@add builder, $slot, $field, $ty);
                )*
                builder.end_table()
            }

            fn view(table: $crate::TableView<'_>) -> Self::View<'_> {
                $view(table)
            }
        }

        impl<'a> $crate::RecordView<'a> for $view<'a> {
            type Owned = $name;

            fn table(&self) -> $crate::TableView<'a> {
                self.0
            }

            fn unpack(&self) -> $crate::Result<$name> {
                Ok($name {
                    $(
                        $field: $crate::define_record!(@unpack self.$field()?, $ty),
                    )*
                })
            }
        }

        impl<'a> $crate::reader::Element<'a> for $view<'a> {
            const WIDTH: usize = <$crate::TableView<'a> as $crate::reader::Element<'a>>::WIDTH;

            fn read(
                reader: $crate::Reader<'a>,
                position: usize,
                depth: usize,
            ) -> $crate::Result<Self> {
                <$crate::TableView<'a> as $crate::reader::Element<'a>>::read(reader, position, depth)
                    .map($view)
            }
        }
    };
}
