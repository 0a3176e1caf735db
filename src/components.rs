pub mod venue_map;
