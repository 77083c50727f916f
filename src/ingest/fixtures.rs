/// Test fixtures: small flood tables in the CSV layout accepted by
/// `ingest::records::parse_csv`.
///
/// Rows are taken from the curated Oklahoma dataset where possible, with
/// deliberately broken cells in the validity fixture.

/// Two clean rows, one flash flood and one river flood.
#[cfg(test)]
pub(crate) fn fixture_two_events_csv() -> &'static str {
    "date,county,type,fatalities,injuries,damage_usd,rain_inches,is_tribal_area
2025-04-30,Oklahoma,Flash Flood,2,5,15000000,12.5,false
2020-05-25,Tulsa,River Flood,0,2,18600000,8.4,true
"
}

/// No `is_tribal_area` column; the flag must come from the county registry.
#[cfg(test)]
pub(crate) fn fixture_without_tribal_column_csv() -> &'static str {
    "date,county,type,fatalities,injuries,damage_usd,rain_inches
2019-05-23,Muskogee,River Flood,0,2,45000000,12.8
2016-06-25,Grady County,Flash Flood,0,1,5600000,4.2
"
}

/// One clean row followed by four rows that must each be rejected:
/// bad date, unknown county, negative damage, empty injuries.
#[cfg(test)]
pub(crate) fn fixture_mixed_validity_csv() -> &'static str {
    "date,county,type,fatalities,injuries,damage_usd,rain_inches,is_tribal_area
2017-05-10,Cleveland,Flash Flood,0,3,8900000,4.7,false
2017-13-40,Cleveland,Flash Flood,0,3,8900000,4.7,false
2018-06-01,Osage,Flash Flood,0,1,100000,2.0,true
2018-06-02,Tulsa,Flash Flood,0,1,-5,2.0,true
2018-06-03,Tulsa,River Flood,0,,250000,1.5,true
"
}

/// Two rows where the second row's county cell holds a stray `0xFF` byte.
#[cfg(test)]
pub(crate) fn fixture_invalid_utf8_csv() -> Vec<u8> {
    let mut table = b"date,county,type,fatalities,injuries,damage_usd,rain_inches,is_tribal_area
2015-05-24,Oklahoma,Flash Flood,1,15,12300000,9.2,false
2016-06-25,Gr"
        .to_vec();
    table.push(0xFF);
    table.extend_from_slice(b"dy,Flash Flood,0,1,5600000,4.2,false\n");
    table
}

/// A single row whose counts sit at the top of the `u32` range.
#[cfg(test)]
pub(crate) fn fixture_extreme_counts_csv() -> &'static str {
    "date,county,type,fatalities,injuries,damage_usd,rain_inches,is_tribal_area
2020-05-25,Tulsa,River Flood,1,4294967295,100,8.4,true
"
}
