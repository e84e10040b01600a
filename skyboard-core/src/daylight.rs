/// Whether `observation` falls strictly between `sunrise` and `sunset`.
///
/// All three are UNIX seconds; the exact sunrise and sunset instants count as night.
pub fn is_daytime(observation: i64, sunrise: i64, sunset: i64) -> bool {
    sunrise < observation && observation < sunset
}
